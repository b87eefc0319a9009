#![allow(dead_code)]

use candlescope::{Ohlcv, Price, PriceBar, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// OHLCV bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub timestamp: u64,
    pub expected: f64,
}

/// Reference MACD value; the signal column is empty while it warms up.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub timestamp: u64,
    pub macd: f64,
    pub signal: Option<f64>,
}

/// Reference BB value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub timestamp: u64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference pattern signals, one row per input bar.
#[derive(Debug, Deserialize)]
pub struct RefPatterns {
    pub timestamp: u64,
    pub doji: i32,
    pub hammer: i32,
    pub shooting_star: i32,
    pub engulfing: i32,
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv-1h.csv";

/// Load the reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load the reference bars as the crate's own bar type.
pub fn load_price_bars() -> Vec<PriceBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load single-value reference data (RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load MACD reference data (macd, signal).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Load BB reference data (upper, middle, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Load pattern reference data.
pub fn load_patterns_ref(path: &str) -> Vec<RefPatterns> {
    load_records(path, "invalid pattern reference record")
}

/// Closes of the reference bars.
pub fn closes(bars: &[RefBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Index of the bar with the given timestamp.
pub fn index_of(bars: &[RefBar], timestamp: u64) -> usize {
    bars.iter()
        .position(|b| b.timestamp == timestamp)
        .unwrap_or_else(|| panic!("no bar at t={timestamp}"))
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert streaming and batch outputs agree bit for bit.
pub fn assert_bits_match(bar_idx: usize, streamed: Option<f64>, batch: Option<f64>) {
    assert_eq!(
        streamed.map(f64::to_bits),
        batch.map(f64::to_bits),
        "streaming and batch diverged at bar {bar_idx}: streamed={streamed:?}, batch={batch:?}"
    );
}

/// Generate reference match + streaming-equivalence tests for a
/// single-value indicator.
///
/// Usage: `reference_test!(rsi_14, Rsi, RsiConfig::new(nz(14)), "tests/fixtures/data/rsi-14-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use candlescope::*;
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let values = <$ind as Indicator>::over($config, &closes(&bars));

                let first = index_of(&bars, reference[0].timestamp);
                assert_eq!(
                    values.iter().position(Option::is_some),
                    Some(first),
                    "{} warm-up ends at the first reference row",
                    stringify!($name)
                );

                for (offset, r) in reference.iter().enumerate() {
                    let i = first + offset;
                    assert_eq!(bars[i].timestamp, r.timestamp);
                    let value = values[i].unwrap_or_else(|| {
                        panic!("{} returned None at t={}", stringify!($name), r.timestamp)
                    });
                    assert_near(
                        value,
                        r.expected,
                        $tolerance,
                        &format!("{} at bar {i} (t={})", stringify!($name), r.timestamp),
                    );
                }

                assert_eq!(first + reference.len(), bars.len(), "reference covers the tail");
            }

            #[test]
            fn streaming_matches_batch() {
                let bars = load_reference_ohlcvs();
                let batch = <$ind as Indicator>::over($config, &closes(&bars));
                let mut ind = <$ind>::new($config);

                for (i, bar) in bars.iter().enumerate() {
                    let streamed = ind.compute(bar.close);
                    assert_bits_match(i, streamed, batch[i]);
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
