use serde::{Deserialize, Serialize};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar timestamp or sequence number.
///
/// Any monotonically increasing key works: epoch seconds, epoch millis, or a
/// plain bar counter. No fixed spacing between bars is assumed, so intraday
/// and daily series are handled the same way.
pub type Timestamp = u64;

/// OHLCV bar data used as input to the indicator engine and the pattern
/// detector.
///
/// Implement this on your own kline/candle type to avoid converting a whole
/// series into [`PriceBar`]s first. Both components accept `&[impl Ohlcv]`.
///
/// # Example
///
/// ```
/// use candlescope::{Ohlcv, Price, Timestamp};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn timestamp(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Bar timestamp. Output series are keyed by this value.
    fn timestamp(&self) -> Timestamp;

    /// Trade volume during the bar, non-negative. Defaults to `0.0`.
    ///
    /// None of the computed indicators or patterns read volume; it is carried
    /// so presentation layers can plot it next to the results.
    fn volume(&self) -> f64 {
        0.0
    }
}

/// A plain OHLCV bar.
///
/// Well-formed bars satisfy `low ≤ min(open, close) ≤ max(open, close) ≤ high`.
/// The invariant is not enforced here: market data is sometimes broken, and
/// the pattern detector treats violating bars as carrying no pattern instead
/// of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    /// Non-negative; [`PriceSeries::new`](crate::PriceSeries::new) rejects
    /// anything else.
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    #[must_use]
    pub fn new(timestamp: Timestamp, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

impl Ohlcv for PriceBar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.volume
    }
}

impl<T: Ohlcv> Ohlcv for &T {
    fn open(&self) -> Price {
        (**self).open()
    }

    fn high(&self) -> Price {
        (**self).high()
    }

    fn low(&self) -> Price {
        (**self).low()
    }

    fn close(&self) -> Price {
        (**self).close()
    }

    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }

    fn volume(&self) -> f64 {
        (**self).volume()
    }
}
