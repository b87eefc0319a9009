use std::ops::Deref;

use crate::{Error, Ohlcv, PriceBar, Result, Timestamp};

/// An ordered, immutable sequence of [`PriceBar`]s.
///
/// Construction checks that timestamps are strictly increasing and volumes
/// are non-negative. OHLC geometry is not validated: malformed bars carry no
/// pattern instead. Once built, the series is only read.
///
/// Dereferences to `[PriceBar]`, so it can be handed to anything taking
/// `&[impl Ohlcv]`.
///
/// # Example
///
/// ```
/// use candlescope::{PriceBar, PriceSeries};
///
/// let series = PriceSeries::new(vec![
///     PriceBar::new(1, 10.0, 11.0, 9.5, 10.5),
///     PriceBar::new(2, 10.5, 11.2, 10.1, 11.0),
/// ])
/// .unwrap();
///
/// assert_eq!(series.len(), 2);
/// assert!(PriceSeries::new(vec![
///     PriceBar::new(2, 10.0, 11.0, 9.5, 10.5),
///     PriceBar::new(2, 10.5, 11.2, 10.1, 11.0),
/// ])
/// .is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Wraps `bars` after checking timestamp ordering and volumes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnorderedTimestamps`] for the first bar whose
    /// timestamp is not greater than its predecessor's, and
    /// [`Error::InvalidVolume`] for the first bar whose volume is negative
    /// or `NaN`.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(Error::UnorderedTimestamps {
                index: index + 1,
                previous: bars[index].timestamp,
                timestamp: bars[index + 1].timestamp,
            });
        }

        if let Some((index, bar)) = bars
            .iter()
            .enumerate()
            .find(|(_, b)| b.volume.is_nan() || b.volume < 0.0)
        {
            return Err(Error::InvalidVolume {
                index,
                volume: bar.volume,
            });
        }

        Ok(Self { bars })
    }

    /// Builds a series from any bar type by copying its OHLCV values.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_bars<B: Ohlcv>(bars: &[B]) -> Result<Self> {
        Self::new(
            bars.iter()
                .map(|b| {
                    PriceBar::new(b.timestamp(), b.open(), b.high(), b.low(), b.close())
                        .with_volume(b.volume())
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Closing prices in series order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    #[must_use]
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<PriceBar> {
        self.bars
    }
}

impl Deref for PriceSeries {
    type Target = [PriceBar];

    fn deref(&self) -> &Self::Target {
        &self.bars
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = Error;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}
