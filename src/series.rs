use serde::Serialize;

use crate::{Ohlcv, Price, Timestamp, pattern::Signal};

/// Values aligned one-to-one with the timestamps of an input series.
///
/// Every output of the engine and the detector is a `Series`: index `i`
/// always refers to input bar `i`, whatever the warm-up of the transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    timestamps: Vec<Timestamp>,
    values: Vec<T>,
    #[serde(skip)]
    sorted: bool,
}

/// Indicator output; `None` marks warm-up bars.
pub type IndicatorSeries = Series<Option<Price>>;

/// Per-bar pattern signal.
pub type SignalSeries = Series<Signal>;

impl<T: Copy> Series<T> {
    pub(crate) fn new(timestamps: Vec<Timestamp>, values: Vec<T>) -> Self {
        debug_assert_eq!(
            timestamps.len(),
            values.len(),
            "series values must align with timestamps"
        );

        let sorted = timestamps.windows(2).all(|w| w[0] < w[1]);

        Self {
            timestamps,
            values,
            sorted,
        }
    }

    pub(crate) fn aligned_to<B: Ohlcv>(bars: &[B], values: Vec<T>) -> Self {
        Self::new(bars.iter().map(Ohlcv::timestamp).collect(), values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Value at bar `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    /// Value of the bar with the given timestamp.
    ///
    /// Binary search when timestamps are strictly increasing (always the
    /// case for a [`PriceSeries`](crate::PriceSeries)); otherwise a linear
    /// scan returning the first bar with that timestamp.
    #[must_use]
    pub fn at(&self, timestamp: Timestamp) -> Option<T> {
        let index = if self.sorted {
            self.timestamps.binary_search(&timestamp).ok()
        } else {
            self.timestamps.iter().position(|&t| t == timestamp)
        };

        index.map(|i| self.values[i])
    }

    /// `(timestamp, value)` pairs in series order.
    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, T)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

impl Series<Option<Price>> {
    /// Index of the first defined value, if any.
    #[must_use]
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Number of defined values.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Values with warm-up bars as `NaN`, the layout plotting libraries expect.
    #[must_use]
    pub fn to_nan_filled(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

impl Series<Signal> {
    /// Indices of bars on which the pattern fired.
    #[must_use]
    pub fn hits(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_present().then_some(i))
            .collect()
    }

    /// Signals as plain integers in `{-100, 0, 100}`.
    #[must_use]
    pub fn to_integers(&self) -> Vec<i32> {
        self.values.iter().map(|s| s.value()).collect()
    }
}
