use serde::Serialize;

use crate::{
    AnalysisConfig, BarSignals, Error, IndicatorEngine, IndicatorSeries, IndicatorSet, Ohlcv,
    PatternDetector, PatternSet, Result, SignalSeries, Timestamp,
};

/// Shortest series a presentation layer should analyse.
///
/// Shorter series still compute, but the indicators are mostly warm-up.
pub const MIN_BARS: usize = 50;

/// Rejects series shorter than `required` bars.
///
/// # Errors
///
/// Returns [`Error::InsufficientData`] when `len < required`.
pub fn ensure_sufficient(len: usize, required: usize) -> Result<()> {
    if len < required {
        return Err(Error::InsufficientData {
            required,
            actual: len,
        });
    }

    Ok(())
}

/// One bar of the recent-patterns table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternRow {
    pub index: usize,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub signals: BarSignals,
}

/// Indicators and candlestick patterns computed over the same bars.
///
/// # Example
///
/// ```
/// use candlescope::{Analysis, AnalysisConfig, PriceBar};
///
/// let bars: Vec<PriceBar> = (0..60u32)
///     .map(|i| {
///         let c = 100.0 + f64::from(i % 9);
///         PriceBar::new(u64::from(i), c - 0.5, c + 1.0, c - 1.0, c)
///     })
///     .collect();
///
/// let analysis = Analysis::compute(&bars, &AnalysisConfig::default());
/// assert_eq!(analysis.len(), 60);
/// assert!(analysis.indicators().rsi.get(14).flatten().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    indicators: IndicatorSet,
    patterns: PatternSet,
}

impl Analysis {
    /// Runs the indicator engine and the pattern detector over `bars`.
    ///
    /// Never fails: a short series yields undefined indicator values. Bars
    /// are read in slice order; build a [`PriceSeries`](crate::PriceSeries)
    /// first to have that order checked.
    #[must_use]
    pub fn compute<B: Ohlcv>(bars: &[B], config: &AnalysisConfig) -> Self {
        let indicators = IndicatorEngine::new(config.indicators).compute(bars);
        let patterns = PatternDetector::new(config.patterns).detect(bars);

        let analysis = Self {
            indicators,
            patterns,
        };
        log::debug!(
            "analysed {} bars, {} with patterns",
            bars.len(),
            analysis.pattern_rows().count()
        );

        analysis
    }

    /// Like [`compute`](Self::compute), but first rejects series shorter
    /// than `config.min_bars`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] for a too-short series.
    pub fn try_compute<B: Ohlcv>(bars: &[B], config: &AnalysisConfig) -> Result<Self> {
        if let Err(e) = ensure_sufficient(bars.len(), config.min_bars) {
            log::warn!("analysis rejected: {e}");
            return Err(e);
        }

        Ok(Self::compute(bars, config))
    }

    #[must_use]
    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        self.patterns.doji.timestamps()
    }

    /// Indicator column by name (`RSI`, `MACD`, `MACD_signal`, ...).
    #[must_use]
    pub fn indicator(&self, name: &str) -> Option<&IndicatorSeries> {
        self.indicators
            .columns()
            .find_map(|(n, s)| (n == name).then_some(s))
    }

    /// Pattern column by name (`Doji`, `Hammer`, `ShootingStar`, `Engulfing`).
    #[must_use]
    pub fn pattern(&self, name: &str) -> Option<&SignalSeries> {
        self.patterns
            .columns()
            .find_map(|(n, s)| (n == name).then_some(s))
    }

    /// The last `limit` bars on which any pattern fired, oldest first.
    #[must_use]
    pub fn recent_patterns(&self, limit: usize) -> Vec<PatternRow> {
        let rows: Vec<PatternRow> = self.pattern_rows().collect();
        let skip = rows.len().saturating_sub(limit);

        rows.into_iter().skip(skip).collect()
    }

    fn pattern_rows(&self) -> impl Iterator<Item = PatternRow> + '_ {
        self.timestamps()
            .iter()
            .enumerate()
            .filter_map(|(index, &timestamp)| {
                let signals = self.patterns.bar(index)?;
                signals.any().then_some(PatternRow {
                    index,
                    timestamp,
                    signals,
                })
            })
    }
}
