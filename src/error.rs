//! Error types.
//!
//! The computation core never fails: degenerate input resolves to undefined
//! indicator values or absent pattern signals. Errors only come from the
//! boundaries around it, such as building a [`PriceSeries`](crate::PriceSeries),
//! loading an [`AnalysisConfig`](crate::AnalysisConfig), or enforcing a
//! minimum series length before analysis.

use crate::Timestamp;

use thiserror::Error;

/// Errors raised at the library boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Series is shorter than the caller's minimum length policy.
    #[error("insufficient data: need {required} bars, got {actual}")]
    InsufficientData {
        /// Required number of bars.
        required: usize,
        /// Actual number of bars provided.
        actual: usize,
    },

    /// Bar timestamps are not strictly increasing.
    #[error(
        "timestamps must be strictly increasing: bar {index} has {timestamp}, previous bar has {previous}"
    )]
    UnorderedTimestamps {
        /// Position of the offending bar.
        index: usize,
        /// Timestamp of the bar before it.
        previous: Timestamp,
        /// Timestamp of the offending bar.
        timestamp: Timestamp,
    },

    /// A bar carries a negative or `NaN` volume.
    #[error("volume must be non-negative: bar {index} has {volume}")]
    InvalidVolume {
        /// Position of the offending bar.
        index: usize,
        /// Its volume.
        volume: f64,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseConfig(#[from] toml::de::Error),
}

impl Error {
    /// Creates an `InvalidConfig` error with a message.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = Error::InsufficientData {
            required: 50,
            actual: 12,
        };
        assert_eq!(err.to_string(), "insufficient data: need 50 bars, got 12");
    }

    #[test]
    fn unordered_timestamps_message() {
        let err = Error::UnorderedTimestamps {
            index: 3,
            previous: 20,
            timestamp: 20,
        };
        assert_eq!(
            err.to_string(),
            "timestamps must be strictly increasing: bar 3 has 20, previous bar has 20"
        );
    }

    #[test]
    fn invalid_volume_message() {
        let err = Error::InvalidVolume {
            index: 4,
            volume: -1.5,
        };
        assert_eq!(
            err.to_string(),
            "volume must be non-negative: bar 4 has -1.5"
        );
    }

    #[test]
    fn invalid_config_helper() {
        let err = Error::invalid_config("fast must be below slow");
        assert!(matches!(err, Error::InvalidConfig(ref m) if m == "fast must be below slow"));
    }
}
