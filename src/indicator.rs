use crate::Price;

use std::fmt::{Debug, Display};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters.
/// Configs are value types: cheap to copy and compare.
pub trait IndicatorConfig: Copy + PartialEq + Display + Debug {
    /// Number of input prices needed before the first defined output.
    ///
    /// Equivalently, the first defined output sits at index
    /// `required_bars() - 1` of the input.
    fn required_bars(&self) -> usize;
}

/// A rolling transform over a price series.
///
/// Indicators keep internal state and update on each call to
/// [`compute`](Indicator::compute). Output is `None` until the rolling window
/// has enough history. Use [`over`](Indicator::over) to run a fresh
/// instance across a whole series; nothing is retained between calls.
///
/// # Example
///
/// ```
/// use candlescope::{Indicator, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(10.0), None);
/// assert_eq!(sma.compute(20.0), None);
/// assert_eq!(sma.compute(30.0), Some(20.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (MACD, Bollinger Bands).
    type Output: Copy + Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds the next price and returns the updated indicator value,
    /// or `None` while warming up.
    fn compute(&mut self, price: Price) -> Option<Self::Output>;

    /// Returns the last computed value without advancing state.
    fn value(&self) -> Option<Self::Output>;

    /// Runs a fresh indicator over `prices`, one output per input.
    ///
    /// A series shorter than the warm-up produces all-`None` output.
    #[must_use]
    fn over(config: Self::Config, prices: &[Price]) -> Vec<Option<Self::Output>> {
        let mut indicator = Self::new(config);
        prices.iter().map(|&p| indicator.compute(p)).collect()
    }
}
