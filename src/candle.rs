use crate::{Ohlcv, Price};

/// Shape of a single candlestick.
///
/// Computed once per bar and shared by every pattern rule:
///
/// ```text
/// body         = |close − open|
/// range        = high − low
/// upper_shadow = high − max(open, close)
/// lower_shadow = min(open, close) − low
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    open: Price,
    close: Price,
    body: Price,
    range: Price,
    upper_shadow: Price,
    lower_shadow: Price,
}

impl Candle {
    /// Measures `bar`, or returns `None` if it is malformed.
    ///
    /// A bar is malformed when any price is non-finite or the ordering
    /// `low ≤ min(open, close) ≤ max(open, close) ≤ high` does not hold.
    /// Shadows and range of such a bar can be negative, so no geometric rule
    /// applies to it.
    ///
    /// # Example
    ///
    /// ```
    /// use candlescope::{Candle, PriceBar};
    ///
    /// let candle = Candle::of(&PriceBar::new(1, 10.0, 12.0, 9.0, 11.0)).unwrap();
    /// assert_eq!(candle.body(), 1.0);
    /// assert_eq!(candle.range(), 3.0);
    /// assert_eq!(candle.upper_shadow(), 1.0);
    /// assert_eq!(candle.lower_shadow(), 1.0);
    ///
    /// // high below close
    /// assert!(Candle::of(&PriceBar::new(2, 10.0, 10.5, 9.0, 11.0)).is_none());
    /// ```
    #[must_use]
    pub fn of(bar: &impl Ohlcv) -> Option<Self> {
        let (open, high, low, close) = (bar.open(), bar.high(), bar.low(), bar.close());

        if ![open, high, low, close].iter().all(|p| p.is_finite()) {
            return None;
        }

        let top = open.max(close);
        let bottom = open.min(close);
        if low > bottom || top > high {
            return None;
        }

        Some(Self {
            open,
            close,
            body: (close - open).abs(),
            range: high - low,
            upper_shadow: high - top,
            lower_shadow: bottom - low,
        })
    }

    #[inline]
    #[must_use]
    pub fn open(&self) -> Price {
        self.open
    }

    #[inline]
    #[must_use]
    pub fn close(&self) -> Price {
        self.close
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Price {
        self.body
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> Price {
        self.range
    }

    #[inline]
    #[must_use]
    pub fn upper_shadow(&self) -> Price {
        self.upper_shadow
    }

    #[inline]
    #[must_use]
    pub fn lower_shadow(&self) -> Price {
        self.lower_shadow
    }

    /// `close > open`.
    #[inline]
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// `close < open`.
    #[inline]
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// High equals low: every price of the bar is the same.
    #[inline]
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.range == 0.0
    }
}
