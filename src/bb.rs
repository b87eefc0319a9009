use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Indicator, IndicatorConfig, Price,
    window::{RollingWindow, RollingWindowWithSumOfSquares},
};

/// Standard deviation multiplier for Bollinger Bands.
///
/// Wraps a positive, finite `f64`. Defaults to `2.0` (the standard Bollinger
/// Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StdDev(f64);

impl StdDev {
    /// Creates a new standard deviation multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero, negative, infinite or NaN. Use
    /// [`TryFrom<f64>`](#impl-TryFrom%3Cf64%3E-for-StdDev) to validate
    /// untrusted input instead.
    #[must_use]
    pub fn new(value: f64) -> Self {
        match Self::try_from(value) {
            Ok(std_dev) => std_dev,
            Err(err) => panic!("{err}"),
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for StdDev {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(Error::invalid_config(format!(
                "std_dev must be positive and finite, got {value}"
            )))
        }
    }
}

impl From<StdDev> for f64 {
    fn from(std_dev: StdDev) -> Self {
        std_dev.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// Bollinger Bands use an SMA for the middle band. Like SMA, values are exact
/// once the window is full, there is no warm-up bias to suppress.
///
/// # Example
///
/// ```
/// use candlescope::{BbConfig, IndicatorConfig, StdDev};
/// use std::num::NonZero;
///
/// // Default: length 20, 2.0 std devs
/// let config = BbConfig::default();
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_bars(), 20);
///
/// let wide = BbConfig::new(NonZero::new(20).unwrap(), StdDev::new(2.5));
/// assert_eq!(wide.std_dev().value(), 2.5);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BbConfig {
    length: NonZero<usize>,
    std_dev: StdDev,
}

impl BbConfig {
    #[must_use]
    pub fn new(length: NonZero<usize>, std_dev: StdDev) -> Self {
        Self { length, std_dev }
    }

    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }
}

impl Default for BbConfig {
    /// BB(20, 2σ), the standard Bollinger Bands setting.
    fn default() -> Self {
        Self {
            length: NonZero::<usize>::MIN.saturating_add(19),
            std_dev: StdDev::default(),
        }
    }
}

impl IndicatorConfig for BbConfig {
    #[inline]
    fn required_bars(&self) -> usize {
        self.length()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BbConfig({}, {})", self.length, self.std_dev.value())
    }
}

/// Bollinger Bands output: upper, middle, and lower bands.
///
/// The middle band is the SMA. Upper and lower bands are offset by
/// `std_dev × σ`, where `σ` is the population standard deviation of the window.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbValue {
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BbValue {
    /// Upper band: `SMA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: SMA of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `SMA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide width
    /// indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// population standard deviations.
///
/// Uses a running sum and sum of squares for O(1) updates per bar. Variance
/// is clamped at zero before the square root, so rounding on a flat window
/// can never invert the bands. While a non-finite price is inside the window
/// all three bands are `NaN`; they recover once it is evicted.
///
/// # Example
///
/// ```
/// use candlescope::{Bb, BbConfig, Indicator};
///
/// let closes = vec![100.0; 20];
/// let out = Bb::over(BbConfig::default(), &closes);
///
/// assert!(out[18].is_none());
/// let v = out[19].unwrap();
/// assert!((v.middle() - 100.0).abs() < 1e-9);
/// assert!(v.width() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
    length_reciprocal: f64,
    std_dev_multiplier: f64,
    window: RollingWindowWithSumOfSquares,
    current: Option<BbValue>,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / config.length() as f64,
            std_dev_multiplier: config.std_dev.value(),
            window: RollingWindow::with_sum_of_squares(config.length()),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, price: Price) -> Option<BbValue> {
        self.window.push(price);

        self.current = match (self.window.sum(), self.window.sum_of_squares()) {
            (Some(sum), Some(sum_of_squares)) => {
                let mean = sum * self.length_reciprocal;

                // Variance = E[X^2] - (E[X])^2 = (sum_of_squares / n) - mean^2
                let variance = sum_of_squares.mul_add(self.length_reciprocal, -(mean * mean));
                let offset = variance.max(0.0).sqrt() * self.std_dev_multiplier;

                Some(BbValue {
                    upper: mean + offset,
                    middle: mean,
                    lower: mean - offset,
                })
            }
            _ => None,
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<BbValue> {
        self.current
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {})",
            self.config.length, self.std_dev_multiplier
        )
    }
}
