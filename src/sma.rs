use std::{fmt::Display, num::NonZero};

use crate::{Indicator, IndicatorConfig, Price, window::RollingWindow};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use candlescope::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_bars(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: NonZero<usize>,
}

impl SmaConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self { length }
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }
}

impl IndicatorConfig for SmaConfig {
    #[inline]
    fn required_bars(&self) -> usize {
        self.length()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({})", self.length)
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. Returns `None` until the window is full.
///
/// Uses a running sum for O(1) updates per bar. A non-finite price makes
/// the average `NaN` for exactly the `length` bars whose window contains it.
///
/// # Example
///
/// ```rust
/// use candlescope::{Sma, SmaConfig, Indicator};
/// use std::num::NonZero;
///
/// let out = Sma::over(SmaConfig::new(NonZero::new(2).unwrap()), &[1.0, 3.0, 5.0]);
/// assert_eq!(out, vec![None, Some(2.0), Some(4.0)]);
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    length_reciprocal: f64,
    window: RollingWindow,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length() as f64,
            window: RollingWindow::new(config.length()),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<Price> {
        self.window.push(price);
        self.current = self.window.sum().map(|sum| sum * self.length_reciprocal);
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.config.length)
    }
}
