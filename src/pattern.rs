//! Candlestick pattern detection.
//!
//! One canonical rule set: each pattern is a fixed geometric inequality over
//! the bar's [`Candle`] shape, with thresholds from [`PatternThresholds`].
//! There are no alternative detector backends, so identical bars always get
//! identical labels.

use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};

use crate::{Candle, Error, Ohlcv, Result, Series, SignalSeries};

/// Direction of a detected pattern.
///
/// Serialises as the integer `-100`, `0` or `100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Bearish,
    #[default]
    Absent,
    Bullish,
}

impl Signal {
    /// `-100`, `0` or `100`.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Signal::Bearish => -100,
            Signal::Absent => 0,
            Signal::Bullish => 100,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Signal::Absent)
    }

    #[inline]
    fn when(condition: bool, signal: Signal) -> Signal {
        if condition { signal } else { Signal::Absent }
    }
}

impl From<Signal> for i32 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

/// Table label: `Bullish`, `Bearish`, or empty when absent.
impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Bearish => f.write_str("Bearish"),
            Signal::Absent => Ok(()),
            Signal::Bullish => f.write_str("Bullish"),
        }
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value())
    }
}

/// The detected candlestick patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Body at most `doji_body_ratio` of the range. Reported as
    /// [`Signal::Bullish`] although a doji is neutral; consumers of the
    /// signal columns rely on that sign.
    Doji,
    /// Long lower shadow, short upper shadow, small body. Bullish.
    Hammer,
    /// Long upper shadow, short lower shadow, small body. Bearish.
    ShootingStar,
    /// Bullish bar whose body engulfs the previous bearish body. Bullish.
    Engulfing,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Doji,
        Pattern::Hammer,
        Pattern::ShootingStar,
        Pattern::Engulfing,
    ];

    /// Column name used for the pattern's signal series.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Doji => "Doji",
            Pattern::Hammer => "Hammer",
            Pattern::ShootingStar => "ShootingStar",
            Pattern::Engulfing => "Engulfing",
        }
    }

    /// Number of preceding bars the rule looks at.
    #[must_use]
    pub const fn lookback(self) -> usize {
        match self {
            Pattern::Engulfing => 1,
            _ => 0,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Thresholds for the geometric pattern rules.
///
/// ```text
/// Doji:         body ≤ doji_body_ratio × range
/// Hammer:       lower_shadow ≥ shadow_body_multiple × body
///               upper_shadow ≤ opposite_shadow_body_multiple × body
///               body ≤ max_body_ratio × range
/// ShootingStar: same with upper and lower shadows swapped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternThresholds {
    pub doji_body_ratio: f64,
    pub shadow_body_multiple: f64,
    pub opposite_shadow_body_multiple: f64,
    pub max_body_ratio: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            doji_body_ratio: 0.1,
            shadow_body_multiple: 2.0,
            opposite_shadow_body_multiple: 1.0,
            max_body_ratio: 0.3,
        }
    }
}

impl PatternThresholds {
    /// Checks every threshold is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("doji_body_ratio", self.doji_body_ratio),
            ("shadow_body_multiple", self.shadow_body_multiple),
            (
                "opposite_shadow_body_multiple",
                self.opposite_shadow_body_multiple,
            ),
            ("max_body_ratio", self.max_body_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(format!(
                    "patterns.{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// All four signals of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BarSignals {
    pub doji: Signal,
    pub hammer: Signal,
    pub shooting_star: Signal,
    pub engulfing: Signal,
}

impl BarSignals {
    #[must_use]
    pub fn get(&self, pattern: Pattern) -> Signal {
        match pattern {
            Pattern::Doji => self.doji,
            Pattern::Hammer => self.hammer,
            Pattern::ShootingStar => self.shooting_star,
            Pattern::Engulfing => self.engulfing,
        }
    }

    /// Whether any pattern fired on the bar.
    #[must_use]
    pub fn any(&self) -> bool {
        Pattern::ALL.iter().any(|&p| self.get(p).is_present())
    }
}

/// Pattern signal series for one input series, aligned to its timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSet {
    pub doji: SignalSeries,
    pub hammer: SignalSeries,
    pub shooting_star: SignalSeries,
    pub engulfing: SignalSeries,
}

impl PatternSet {
    #[must_use]
    pub fn get(&self, pattern: Pattern) -> &SignalSeries {
        match pattern {
            Pattern::Doji => &self.doji,
            Pattern::Hammer => &self.hammer,
            Pattern::ShootingStar => &self.shooting_star,
            Pattern::Engulfing => &self.engulfing,
        }
    }

    /// Signals of bar `index`, or `None` past the end.
    #[must_use]
    pub fn bar(&self, index: usize) -> Option<BarSignals> {
        Some(BarSignals {
            doji: self.doji.get(index)?,
            hammer: self.hammer.get(index)?,
            shooting_star: self.shooting_star.get(index)?,
            engulfing: self.engulfing.get(index)?,
        })
    }

    /// Column names paired with their series, in display order.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &SignalSeries)> {
        Pattern::ALL.into_iter().map(|p| (p.name(), self.get(p)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doji.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doji.is_empty()
    }
}

/// Classifies bars into [`Pattern`]s.
///
/// Pure function of the OHLC values and the thresholds. Patterns are not
/// mutually exclusive: a bar can be a doji and a hammer at once.
///
/// Degenerate bars never fail:
/// - malformed bars (see [`Candle::of`]) carry no pattern, and neither does the
///   engulfing check of the bar after them;
/// - zero-range bars are dojis by convention but are skipped by the
///   shadow-ratio rules (hammer, shooting star);
/// - the first bar of a series is never an engulfing.
///
/// # Example
///
/// ```
/// use candlescope::{PatternDetector, PriceBar, Signal};
///
/// let detector = PatternDetector::default();
/// let hammer = PriceBar::new(1, 10.0, 10.1, 8.0, 10.05);
///
/// assert_eq!(detector.hammer(&hammer), Signal::Bullish);
/// assert_eq!(detector.shooting_star(&hammer), Signal::Absent);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDetector {
    thresholds: PatternThresholds,
}

impl PatternDetector {
    #[must_use]
    pub fn new(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &PatternThresholds {
        &self.thresholds
    }

    /// Doji: `body ≤ doji_body_ratio × range`. Always [`Signal::Bullish`]
    /// when present.
    #[must_use]
    pub fn doji(&self, bar: &impl Ohlcv) -> Signal {
        Candle::of(bar).map_or(Signal::Absent, |c| self.doji_of(&c))
    }

    /// Hammer: long lower shadow under a small body near the high.
    #[must_use]
    pub fn hammer(&self, bar: &impl Ohlcv) -> Signal {
        Candle::of(bar).map_or(Signal::Absent, |c| self.hammer_of(&c))
    }

    /// Shooting star: long upper shadow over a small body near the low.
    #[must_use]
    pub fn shooting_star(&self, bar: &impl Ohlcv) -> Signal {
        Candle::of(bar).map_or(Signal::Absent, |c| self.shooting_star_of(&c))
    }

    /// Bullish engulfing of `prev` by `bar`:
    /// `prev_close < prev_open`, `close > open`, `open < prev_close` and
    /// `close > prev_open`.
    #[must_use]
    pub fn engulfing(&self, prev: &impl Ohlcv, bar: &impl Ohlcv) -> Signal {
        match (Candle::of(prev), Candle::of(bar)) {
            (Some(prev), Some(cur)) => Self::engulfing_of(&prev, &cur),
            _ => Signal::Absent,
        }
    }

    /// All four signals of `bars[index]`, using `bars[index - 1]` for the
    /// engulfing check. Past the end of `bars` every signal is absent.
    #[must_use]
    pub fn classify<B: Ohlcv>(&self, bars: &[B], index: usize) -> BarSignals {
        let Some(bar) = bars.get(index) else {
            return BarSignals::default();
        };
        let prev = index
            .checked_sub(Pattern::Engulfing.lookback())
            .and_then(|i| bars.get(i))
            .and_then(Candle::of);

        self.classify_candle(prev.as_ref(), Candle::of(bar), index)
    }

    /// Runs every rule over `bars`.
    ///
    /// Engulfing compares each bar with the one before it in the slice, so
    /// bars should be in timestamp order.
    #[must_use]
    pub fn detect<B: Ohlcv>(&self, bars: &[B]) -> PatternSet {
        let candles: Vec<Option<Candle>> = bars.iter().map(Candle::of).collect();

        let signals: Vec<BarSignals> = candles
            .iter()
            .enumerate()
            .map(|(i, &candle)| {
                let prev = i
                    .checked_sub(Pattern::Engulfing.lookback())
                    .and_then(|p| candles[p].as_ref());
                self.classify_candle(prev, candle, i)
            })
            .collect();

        let column = |pick: fn(&BarSignals) -> Signal| {
            Series::aligned_to(bars, signals.iter().map(pick).collect())
        };

        PatternSet {
            doji: column(|s| s.doji),
            hammer: column(|s| s.hammer),
            shooting_star: column(|s| s.shooting_star),
            engulfing: column(|s| s.engulfing),
        }
    }

    fn classify_candle(
        &self,
        prev: Option<&Candle>,
        candle: Option<Candle>,
        index: usize,
    ) -> BarSignals {
        let Some(candle) = candle else {
            log::trace!("bar {index} is malformed, no pattern detected");
            return BarSignals::default();
        };

        BarSignals {
            doji: self.doji_of(&candle),
            hammer: self.hammer_of(&candle),
            shooting_star: self.shooting_star_of(&candle),
            engulfing: prev.map_or(Signal::Absent, |p| Self::engulfing_of(p, &candle)),
        }
    }

    fn doji_of(&self, c: &Candle) -> Signal {
        Signal::when(
            c.body() <= self.thresholds.doji_body_ratio * c.range(),
            Signal::Bullish,
        )
    }

    /// Long `shadow`, short `opposite` shadow, small body. Skipped on flat
    /// bars, where the ratios are meaningless.
    fn long_shadow(&self, c: &Candle, shadow: f64, opposite: f64) -> bool {
        let t = &self.thresholds;

        !c.is_flat()
            && shadow >= t.shadow_body_multiple * c.body()
            && opposite <= t.opposite_shadow_body_multiple * c.body()
            && c.body() <= t.max_body_ratio * c.range()
    }

    fn hammer_of(&self, c: &Candle) -> Signal {
        Signal::when(
            self.long_shadow(c, c.lower_shadow(), c.upper_shadow()),
            Signal::Bullish,
        )
    }

    fn shooting_star_of(&self, c: &Candle) -> Signal {
        Signal::when(
            self.long_shadow(c, c.upper_shadow(), c.lower_shadow()),
            Signal::Bearish,
        )
    }

    fn engulfing_of(prev: &Candle, c: &Candle) -> Signal {
        Signal::when(
            prev.is_bearish()
                && c.is_bullish()
                && c.open() < prev.close()
                && c.close() > prev.open(),
            Signal::Bullish,
        )
    }
}
