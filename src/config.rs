use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, IndicatorSettings, MIN_BARS, PatternThresholds, Result};

/// Settings for an [`Analysis`](crate::Analysis) run.
///
/// Every field has a default, so a TOML document only needs the values it
/// changes:
///
/// ```toml
/// min_bars = 100
///
/// [indicators.macd]
/// fast = 8
/// slow = 21
///
/// [patterns]
/// doji_body_ratio = 0.05
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Shortest series [`Analysis::try_compute`](crate::Analysis::try_compute)
    /// accepts.
    pub min_bars: usize,
    pub indicators: IndicatorSettings,
    pub patterns: PatternThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_bars: MIN_BARS,
            indicators: IndicatorSettings::default(),
            patterns: PatternThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`Error::ParseConfig`] for malformed TOML or unknown keys,
    /// [`Error::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        log::debug!("loaded analysis config: {config:?}");

        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("reading analysis config from {}", path.display());

        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Checks the values the types alone cannot enforce.
    ///
    /// Window lengths are non-zero and the std-dev multiplier positive by
    /// construction; this adds `fast < slow` for MACD and the pattern
    /// threshold ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let macd = self.indicators.macd;
        if macd.fast() >= macd.slow() {
            return Err(Error::invalid_config(format!(
                "indicators.macd.fast ({}) must be less than slow ({})",
                macd.fast(),
                macd.slow()
            )));
        }

        self.patterns.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StdDev;

    mod parsing {
        use super::*;

        #[test]
        fn empty_document_is_default() {
            let config = AnalysisConfig::from_toml_str("").unwrap();
            assert_eq!(config, AnalysisConfig::default());
            assert_eq!(config.min_bars, 50);
        }

        #[test]
        fn partial_document_overrides_named_values() {
            let config = AnalysisConfig::from_toml_str(
                r"
                min_bars = 100

                [indicators.rsi]
                length = 21

                [indicators.macd]
                fast = 8
                slow = 21

                [indicators.bb]
                std_dev = 2.5

                [patterns]
                doji_body_ratio = 0.05
                ",
            )
            .unwrap();

            assert_eq!(config.min_bars, 100);
            assert_eq!(config.indicators.rsi.length(), 21);
            assert_eq!(config.indicators.macd.fast(), 8);
            assert_eq!(config.indicators.macd.slow(), 21);
            assert_eq!(config.indicators.macd.signal(), 9);
            assert_eq!(config.indicators.bb.length(), 20);
            assert_eq!(config.indicators.bb.std_dev(), StdDev::new(2.5));
            assert!((config.patterns.doji_body_ratio - 0.05).abs() < f64::EPSILON);
            assert!((config.patterns.max_body_ratio - 0.3).abs() < f64::EPSILON);
        }

        #[test]
        fn unknown_key_is_rejected() {
            let result = AnalysisConfig::from_toml_str("[indicators.atr]\nlength = 14\n");
            assert!(matches!(result, Err(Error::ParseConfig(_))));
        }

        #[test]
        fn zero_length_is_rejected_by_type() {
            let result = AnalysisConfig::from_toml_str("[indicators.rsi]\nlength = 0\n");
            assert!(matches!(result, Err(Error::ParseConfig(_))));
        }

        #[test]
        fn non_positive_std_dev_is_rejected_by_type() {
            let result = AnalysisConfig::from_toml_str("[indicators.bb]\nstd_dev = 0.0\n");
            assert!(matches!(result, Err(Error::ParseConfig(_))));
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn fast_must_be_below_slow() {
            let result =
                AnalysisConfig::from_toml_str("[indicators.macd]\nfast = 26\nslow = 12\n");
            assert!(matches!(result, Err(Error::InvalidConfig(_))));
        }

        #[test]
        fn negative_threshold_is_rejected() {
            let result = AnalysisConfig::from_toml_str("[patterns]\nmax_body_ratio = -0.5\n");
            assert!(matches!(result, Err(Error::InvalidConfig(msg)) if msg.contains("max_body_ratio")));
        }

        #[test]
        fn default_is_valid() {
            assert!(AnalysisConfig::default().validate().is_ok());
        }
    }

    mod files {
        use super::*;

        #[test]
        fn missing_file_is_io_error() {
            let result = AnalysisConfig::from_file("/nonexistent/candlescope.toml");
            assert!(matches!(result, Err(Error::Io(_))));
        }

        #[test]
        fn reads_file() {
            let path = std::env::temp_dir().join(format!(
                "candlescope-config-{}.toml",
                std::process::id()
            ));
            std::fs::write(&path, "min_bars = 60\n").unwrap();
            let config = AnalysisConfig::from_file(&path);
            std::fs::remove_file(&path).unwrap();
            assert_eq!(config.unwrap().min_bars, 60);
        }

        #[test]
        fn serialises_back_to_toml() {
            let config = AnalysisConfig::default();
            let text = toml::to_string(&config).unwrap();
            assert_eq!(AnalysisConfig::from_toml_str(&text).unwrap(), config);
        }
    }
}
