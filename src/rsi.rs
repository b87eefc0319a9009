use std::{fmt::Display, num::NonZero};

use serde::{Deserialize, Serialize};

use crate::{Indicator, IndicatorConfig, Price};

/// Conventional overbought level for RSI.
pub const RSI_OVERBOUGHT: Price = 70.0;

/// Conventional oversold level for RSI.
pub const RSI_OVERSOLD: Price = 30.0;

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at bar index `length`.
///
/// # Example
///
/// ```
/// use candlescope::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// assert_eq!(config.required_bars(), 15);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsiConfig {
    length: NonZero<usize>,
}

impl RsiConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self { length }
    }

    /// Number of price changes averaged.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }
}

impl Default for RsiConfig {
    /// RSI(14).
    fn default() -> Self {
        Self {
            length: NonZero::<usize>::MIN.saturating_add(13),
        }
    }
}

impl IndicatorConfig for RsiConfig {
    /// One extra bar: the first change needs a predecessor.
    #[inline]
    fn required_bars(&self) -> usize {
        self.length() + 1
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({})", self.length)
    }
}

#[derive(Clone, Debug)]
enum RsiPhase {
    Seeding {
        sum_gain: f64,
        sum_loss: f64,
        seen_changes: usize,
    },
    Active {
        avg_gain: f64,
        avg_loss: f64,
    },
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above [`RSI_OVERBOUGHT`] are conventionally
/// considered overbought; below [`RSI_OVERSOLD`], oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed). After seeding, gains and losses are smoothed
/// with Wilder's method (`α = 1 / length`):
///
/// ```text
/// avg_gain = (prev_avg_gain × (length − 1) + gain) / length
/// avg_loss = (prev_avg_loss × (length − 1) + loss) / length
/// RS       = avg_gain / avg_loss
/// RSI      = 100 − 100 / (1 + RS)
/// ```
///
/// When `avg_loss` is zero the RSI is 100, flat prices included.
///
/// A non-finite price is skipped: the averages and the previous price are
/// left untouched, and the output for that bar is `NaN` (or `None` while
/// still seeding). The next finite price is compared with the last finite
/// one.
///
/// # Example
///
/// ```
/// use candlescope::{Indicator, Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let mut rsi = Rsi::new(RsiConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding: need 3 price changes (4 bars)
/// assert_eq!(rsi.compute(10.0), None);
/// assert_eq!(rsi.compute(12.0), None);
/// assert_eq!(rsi.compute(11.0), None);
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RS=4 → RSI=80
/// assert!((rsi.compute(13.0).unwrap() - 80.0).abs() < 1e-10);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    prev_price: Option<Price>,
    phase: RsiPhase,
    current: Option<Price>,
    length_reciprocal: f64,
    length_minus_one: f64,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            prev_price: None,
            phase: RsiPhase::Seeding {
                sum_gain: 0.0,
                sum_loss: 0.0,
                seen_changes: 0,
            },
            current: None,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length() as f64,
            #[allow(clippy::cast_precision_loss)]
            length_minus_one: (config.length() - 1) as f64,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<Price> {
        if !price.is_finite() {
            self.current = matches!(self.phase, RsiPhase::Active { .. }).then_some(f64::NAN);
            return self.current;
        }

        // First bar: no previous price, no change
        let Some(prev_price) = self.prev_price.replace(price) else {
            return None;
        };

        let (gain, loss) = Self::gain_and_loss(prev_price, price);

        self.current = match &mut self.phase {
            RsiPhase::Seeding {
                sum_gain,
                sum_loss,
                seen_changes,
            } => {
                *sum_gain += gain;
                *sum_loss += loss;
                *seen_changes += 1;

                if *seen_changes == self.config.length() {
                    let avg_gain = *sum_gain * self.length_reciprocal;
                    let avg_loss = *sum_loss * self.length_reciprocal;
                    self.phase = RsiPhase::Active { avg_gain, avg_loss };

                    Some(Self::rsi_from_averages(avg_gain, avg_loss))
                } else {
                    None
                }
            }

            RsiPhase::Active { avg_gain, avg_loss } => {
                *avg_gain = avg_gain.mul_add(self.length_minus_one, gain) * self.length_reciprocal;
                *avg_loss = avg_loss.mul_add(self.length_minus_one, loss) * self.length_reciprocal;

                Some(Self::rsi_from_averages(*avg_gain, *avg_loss))
            }
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.config.length)
    }
}
