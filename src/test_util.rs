// src/test_util.rs

use crate::{Ohlcv, Price, Timestamp};

use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

#[derive(Clone, Copy, Debug)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: u64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            timestamp: 0,
        }
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Bars with OHLC all equal to the given closes, timestamps `1..`.
pub fn flat_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .zip(1..)
        .map(|(&c, t)| Bar::new(c, c, c, c).at(t))
        .collect()
}

/// Deterministic wavy close series for property-style checks.
pub fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            100.0 + 5.0 * (x * 0.37).sin() + 2.0 * (x * 1.13).cos() + 0.05 * x
        })
        .collect()
}

impl Ohlcv for Bar {
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
}
