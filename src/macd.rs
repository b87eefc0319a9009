use std::{fmt::Display, num::NonZero};

use serde::{Deserialize, Serialize};

use crate::{Ema, EmaConfig, Indicator, IndicatorConfig, Price};

/// Configuration for the [`Macd`] indicator.
///
/// Defaults to the classic MACD(12, 26, 9).
///
/// # Example
///
/// ```
/// use candlescope::{IndicatorConfig, MacdConfig};
///
/// let config = MacdConfig::default();
/// assert_eq!((config.fast(), config.slow(), config.signal()), (12, 26, 9));
///
/// // MACD line from bar 26, signal line from bar 34
/// assert_eq!(config.required_bars(), 26);
/// assert_eq!(config.signal_required_bars(), 34);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdConfig {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
}

impl MacdConfig {
    #[must_use]
    pub fn new(fast: NonZero<usize>, slow: NonZero<usize>, signal: NonZero<usize>) -> Self {
        Self { fast, slow, signal }
    }

    /// Fast EMA length.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    /// Slow EMA length.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.get()
    }

    /// Signal line EMA length.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }

    /// Number of bars needed before the signal line is defined.
    #[must_use]
    pub fn signal_required_bars(&self) -> usize {
        self.required_bars() + self.signal() - 1
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: NonZero::<usize>::MIN.saturating_add(11),
            slow: NonZero::<usize>::MIN.saturating_add(25),
            signal: NonZero::<usize>::MIN.saturating_add(8),
        }
    }
}

impl IndicatorConfig for MacdConfig {
    /// Bars needed for the MACD line: the longer of the two EMA windows.
    #[inline]
    fn required_bars(&self) -> usize {
        self.fast().max(self.slow())
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {})",
            self.fast, self.slow, self.signal
        )
    }
}

/// MACD output for one bar.
///
/// The signal line lags the MACD line by `signal − 1` bars, so it is
/// `None` for the first few bars on which the MACD line is already defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    macd: Price,
    signal: Option<Price>,
}

impl MacdValue {
    /// MACD line: `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Signal line: `EMA(MACD, signal)`.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Option<Price> {
        self.signal
    }

    /// Histogram: `MACD − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Option<Price> {
        self.signal.map(|s| self.macd - s)
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.signal {
            Some(signal) => write!(f, "MACD(m: {}, s: {})", self.macd, signal),
            None => write!(f, "MACD(m: {}, s: -)", self.macd),
        }
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// MACD      = EMA(close, fast) − EMA(close, slow)
/// signal    = EMA(MACD, signal)
/// histogram = MACD − signal
/// ```
///
/// All three EMAs are SMA-seeded (see [`Ema`]). The MACD line is
/// defined once both price EMAs are; the signal EMA only starts consuming
/// MACD values from that point on.
///
/// Non-finite prices are skipped by every EMA (see [`Ema`]): the bar reads
/// `NaN` and later bars continue as if it were absent.
///
/// # Example
///
/// ```
/// use candlescope::{Indicator, Macd, MacdConfig};
///
/// let closes: Vec<f64> = (1..=40).map(f64::from).collect();
/// let out = Macd::over(MacdConfig::default(), &closes);
///
/// assert!(out[24].is_none());
/// assert!(out[25].unwrap().signal().is_none());
/// assert!(out[33].unwrap().signal().is_some());
///
/// // Steady uptrend: fast EMA above slow EMA
/// assert!(out[39].unwrap().macd() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    current: Option<MacdValue>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(EmaConfig::new(config.fast)),
            slow: Ema::new(EmaConfig::new(config.slow)),
            signal: Ema::new(EmaConfig::new(config.signal)),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<MacdValue> {
        let fast = self.fast.compute(price);
        let slow = self.slow.compute(price);

        self.current = match (fast, slow) {
            (Some(fast), Some(slow)) => {
                let macd = fast - slow;

                Some(MacdValue {
                    macd,
                    signal: self.signal.compute(macd),
                })
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<MacdValue> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal
        )
    }
}
