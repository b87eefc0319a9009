//! Technical indicators and candlestick patterns over OHLCV price series.
//!
//! Two independent, deterministic components share the same input:
//!
//! - [`IndicatorEngine`] computes RSI, MACD and Bollinger Bands from the
//!   close prices;
//! - [`PatternDetector`] labels every bar as Doji, Hammer, Shooting Star
//!   and/or Bullish Engulfing from its OHLC geometry.
//!
//! [`Analysis`] runs both over one series. Every output is aligned to the
//! input timestamps; warm-up values are `None` and pattern signals are one
//! of `-100`, `0`, `100`.
//!
//! ```
//! use candlescope::{Analysis, AnalysisConfig, PriceBar, PriceSeries};
//!
//! let bars: Vec<PriceBar> = (0..80u32)
//!     .map(|i| {
//!         let close = 100.0 + f64::from(i % 11) - f64::from(i % 4);
//!         PriceBar::new(u64::from(i) * 3600, close - 0.4, close + 1.0, close - 1.2, close)
//!     })
//!     .collect();
//! let series = PriceSeries::new(bars)?;
//!
//! let analysis = Analysis::try_compute(&series, &AnalysisConfig::default())?;
//! for row in analysis.recent_patterns(15) {
//!     println!("{} doji={} hammer={}", row.timestamp, row.signals.doji, row.signals.hammer);
//! }
//! # Ok::<(), candlescope::Error>(())
//! ```
//!
//! The rolling transforms ([`Sma`], [`Ema`], [`Rsi`], [`Macd`], [`Bb`])
//! expose [`new`](Sma::new), [`compute`](Sma::compute) and
//! [`value`](Sma::value) as inherent methods, so no trait import is needed.
//! Import [`Indicator`] only for generic code or the batch
//! [`over`](Indicator::over) helper.

mod analysis;
mod bb;
mod candle;
mod config;
mod ema;
mod engine;
mod error;
mod indicator;
mod macd;
mod ohlcv;
mod pattern;
mod price_series;
mod rsi;
mod series;
mod sma;
mod window;

pub use crate::error::{Error, Result};
pub use crate::indicator::{Indicator, IndicatorConfig};
pub use crate::ohlcv::{Ohlcv, Price, PriceBar, Timestamp};
pub use crate::price_series::PriceSeries;
pub use crate::series::{IndicatorSeries, Series, SignalSeries};

pub use crate::bb::{Bb, BbConfig, BbValue, StdDev};
pub use crate::ema::{Ema, EmaConfig};
pub use crate::macd::{Macd, MacdConfig, MacdValue};
pub use crate::rsi::{RSI_OVERBOUGHT, RSI_OVERSOLD, Rsi, RsiConfig};
pub use crate::sma::{Sma, SmaConfig};

pub use crate::engine::{IndicatorEngine, IndicatorSet, IndicatorSettings};

pub use crate::candle::Candle;
pub use crate::pattern::{
    BarSignals, Pattern, PatternDetector, PatternSet, PatternThresholds, Signal,
};

pub use crate::analysis::{Analysis, MIN_BARS, PatternRow, ensure_sufficient};
pub use crate::config::AnalysisConfig;

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, price: Price) -> Option<$output> {
                <Self as Indicator>::compute(self, price)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Rsi, RsiConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);
impl_indicator_methods!(Bb, BbConfig, BbValue);

#[cfg(test)]
mod test_util;
