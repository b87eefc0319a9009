use serde::{Deserialize, Serialize};

use crate::{
    Bb, BbConfig, BbValue, Indicator, IndicatorConfig, IndicatorSeries, Macd, MacdConfig,
    MacdValue, Ohlcv, Price, Rsi, RsiConfig, Series,
};

/// Window parameters for the three indicators.
///
/// Defaults: RSI(14), MACD(12, 26, 9), BB(20, 2σ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorSettings {
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub bb: BbConfig,
}

impl IndicatorSettings {
    /// Bars needed before every output series (MACD signal included) has a
    /// defined value.
    #[must_use]
    pub fn required_bars(&self) -> usize {
        self.rsi
            .required_bars()
            .max(self.macd.signal_required_bars())
            .max(self.bb.required_bars())
    }
}

/// Indicator outputs for one input series, all aligned to its timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub macd_signal: IndicatorSeries,
    pub macd_histogram: IndicatorSeries,
    pub bb_upper: IndicatorSeries,
    pub bb_middle: IndicatorSeries,
    pub bb_lower: IndicatorSeries,
}

impl IndicatorSet {
    /// Column names paired with their series, in display order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &IndicatorSeries)> {
        [
            ("RSI", &self.rsi),
            ("MACD", &self.macd),
            ("MACD_signal", &self.macd_signal),
            ("MACD_hist", &self.macd_histogram),
            ("BB_upper", &self.bb_upper),
            ("BB_middle", &self.bb_middle),
            ("BB_lower", &self.bb_lower),
        ]
        .into_iter()
    }
}

/// Computes RSI, MACD and Bollinger Bands from close prices.
///
/// The engine holds only its window parameters. Every call builds fresh
/// indicator state, so repeated calls on the same input give bit-identical
/// results and one engine can be shared freely across threads.
///
/// Series shorter than a window yield all-`None` output for that indicator;
/// nothing here fails. A non-finite close reads `NaN`: for one bar in RSI
/// and MACD, and for every window containing it in the Bollinger Bands.
///
/// # Example
///
/// ```
/// use candlescope::{IndicatorEngine, IndicatorSettings};
///
/// let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i % 7)).collect();
/// let engine = IndicatorEngine::new(IndicatorSettings::default());
///
/// let rsi = engine.rsi(&closes);
/// assert!(rsi[13].is_none());
/// assert!(rsi[14].is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    #[must_use]
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Wilder RSI; `None` for the first `rsi.length` bars.
    #[must_use]
    pub fn rsi(&self, closes: &[Price]) -> Vec<Option<Price>> {
        Rsi::over(self.settings.rsi, closes)
    }

    /// MACD line and signal; `None` until the slow EMA is seeded.
    #[must_use]
    pub fn macd(&self, closes: &[Price]) -> Vec<Option<MacdValue>> {
        Macd::over(self.settings.macd, closes)
    }

    /// Bollinger Bands; `None` for the first `bb.length − 1` bars.
    #[must_use]
    pub fn bollinger(&self, closes: &[Price]) -> Vec<Option<BbValue>> {
        Bb::over(self.settings.bb, closes)
    }

    /// Runs all three indicators over the closes of `bars`.
    ///
    /// Bars are taken in slice order. Pass a [`PriceSeries`](crate::PriceSeries)
    /// to have timestamp order checked up front.
    #[must_use]
    pub fn compute<B: Ohlcv>(&self, bars: &[B]) -> IndicatorSet {
        let closes: Vec<Price> = bars.iter().map(Ohlcv::close).collect();

        let rsi = self.rsi(&closes);
        let macd = self.macd(&closes);
        let bb = self.bollinger(&closes);

        let column = |values: Vec<Option<Price>>| Series::aligned_to(bars, values);

        IndicatorSet {
            rsi: column(rsi),
            macd: column(macd.iter().map(|v| v.map(|v| v.macd())).collect()),
            macd_signal: column(macd.iter().map(|v| v.and_then(|v| v.signal())).collect()),
            macd_histogram: column(macd.iter().map(|v| v.and_then(|v| v.histogram())).collect()),
            bb_upper: column(bb.iter().map(|v| v.map(|v| v.upper())).collect()),
            bb_middle: column(bb.iter().map(|v| v.map(|v| v.middle())).collect()),
            bb_lower: column(bb.iter().map(|v| v.map(|v| v.lower())).collect()),
        }
    }
}
