use std::{fmt::Display, num::NonZero};

use crate::{Indicator, IndicatorConfig, Price, Sma, SmaConfig};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use candlescope::{EmaConfig, IndicatorConfig};
/// use std::num::NonZero;
///
/// let config = EmaConfig::new(NonZero::new(12).unwrap());
///
/// assert_eq!(config.length(), 12);
/// assert_eq!(config.required_bars(), 12);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: NonZero<usize>,
}

impl EmaConfig {
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

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let n = (self.length() + 1) as f64;
        2.0 / n
    }
}

impl IndicatorConfig for EmaConfig {
    #[inline]
    fn required_bars(&self) -> usize {
        self.length()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({})", self.length)
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = α × price + (1 − α) × prev_EMA
/// ```
///
/// The first `length` prices are collected to compute an SMA
/// seed value, which is also the first output. After seeding,
/// the SMA state is dropped and the EMA runs with O(1) memory
/// via a single fused multiply-add.
///
/// A non-finite price is skipped: the average is not updated, and the
/// output for that bar is `NaN` (or `None` while still seeding).
///
/// # Example
///
/// ```
/// use candlescope::{Ema, EmaConfig, Indicator};
/// use std::num::NonZero;
///
/// let mut ema = Ema::new(EmaConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding phase: collecting SMA
/// assert_eq!(ema.compute(2.0), None);
/// assert_eq!(ema.compute(4.0), None);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(ema.compute(6.0), Some(4.0));
///
/// // EMA(3) α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(ema.compute(8.0), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    seed: Option<Sma>,
    alpha: f64,
    average: Option<Price>,
    current: Option<Price>,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            seed: Some(Sma::new(SmaConfig::new(config.length))),
            alpha: config.alpha(),
            average: None,
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<Price> {
        if !price.is_finite() {
            self.current = self.average.map(|_| f64::NAN);
            return self.current;
        }

        if let Some(sma) = &mut self.seed {
            self.average = sma.compute(price);
            if self.average.is_some() {
                self.seed = None;
            }
        } else if let Some(previous) = self.average {
            self.average = Some(self.alpha.mul_add(price - previous, previous));
        }

        self.current = self.average;
        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.config.length)
    }
}
