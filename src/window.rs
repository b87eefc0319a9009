use crate::Price;

#[derive(Clone, Debug)]
struct RingBuffer {
    buffer: Vec<Price>,
    head: usize,
    len: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Appends `value`, returning the evicted oldest value once full.
    #[inline]
    fn push(&mut self, value: Price) -> Option<Price> {
        if self.is_full() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;
            self.head += 1;
            if self.head == self.buffer.len() {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.len += 1;

            None
        }
    }
}

/// Fixed-size window over the most recent prices.
///
/// Keeps a running sum (and, for `RollingWindow<true>`, a running sum of
/// squares) so the mean and variance of the window are O(1) per bar.
///
/// Non-finite prices are counted instead of summed. While one is inside the
/// window both sums read `NaN`; once it is evicted the sums are exact again.
#[derive(Clone, Debug)]
pub(crate) struct RollingWindow<const SUM_OF_SQUARES: bool = false> {
    values: RingBuffer,
    /// Sum of the finite prices in the window. May accumulate FP rounding
    /// drift over very long runs, negligible for typical window sizes on
    /// financial data.
    sum: Price,
    sum_of_squares: f64,
    non_finite: usize,
}

pub(crate) type RollingWindowWithSumOfSquares = RollingWindow<true>;

impl RollingWindow {
    pub fn new(size: usize) -> Self {
        Self::empty(size)
    }
}

impl RollingWindow<true> {
    pub fn with_sum_of_squares(size: usize) -> Self {
        Self::empty(size)
    }
}

impl<const SUM_OF_SQUARES: bool> RollingWindow<SUM_OF_SQUARES> {
    fn empty(size: usize) -> Self {
        debug_assert!(size > 0, "window size must be positive");

        Self {
            values: RingBuffer::new(size),
            sum: 0.0,
            sum_of_squares: 0.0,
            non_finite: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, price: Price) {
        if let Some(old) = self.values.push(price) {
            if old.is_finite() {
                self.sum -= old;
                if SUM_OF_SQUARES {
                    self.sum_of_squares -= old * old;
                }
            } else {
                self.non_finite -= 1;
            }
        }

        if price.is_finite() {
            self.sum += price;
            if SUM_OF_SQUARES {
                self.sum_of_squares += price * price;
            }
        } else {
            self.non_finite += 1;
        }
    }

    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then(|| self.or_nan(self.sum))
    }

    #[inline]
    pub fn sum_of_squares(&self) -> Option<f64> {
        assert!(
            SUM_OF_SQUARES,
            "sum_of_squares requires RollingWindow<true>"
        );
        self.is_ready().then(|| self.or_nan(self.sum_of_squares))
    }

    /// Whether a non-finite price is inside the window.
    #[inline]
    pub fn has_non_finite(&self) -> bool {
        self.non_finite > 0
    }

    #[inline]
    fn or_nan(&self, value: f64) -> f64 {
        if self.has_non_finite() { f64::NAN } else { value }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.values.is_full()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    mod ring_buffer {
        use super::*;

        #[test]
        fn filling_returns_none() {
            let mut rb = RingBuffer::new(3);
            assert_eq!(rb.push(1.0), None);
            assert_eq!(rb.push(2.0), None);
            assert_eq!(rb.push(3.0), None);
            assert!(rb.is_full());
        }

        #[test]
        fn full_evicts_oldest() {
            let mut rb = RingBuffer::new(3);
            rb.push(1.0);
            rb.push(2.0);
            rb.push(3.0);
            assert_eq!(rb.push(4.0), Some(1.0));
            assert_eq!(rb.push(5.0), Some(2.0));
            assert_eq!(rb.push(6.0), Some(3.0));
            assert_eq!(rb.push(7.0), Some(4.0));
        }

        #[test]
        fn capacity_one() {
            let mut rb = RingBuffer::new(1);
            assert_eq!(rb.push(1.0), None);
            assert!(rb.is_full());
            assert_eq!(rb.push(2.0), Some(1.0));
            assert_eq!(rb.push(3.0), Some(2.0));
        }
    }

    mod filling {
        use super::*;

        #[test]
        fn sum_is_none_when_empty() {
            let w = RollingWindow::new(3);
            assert_eq!(w.sum(), None);
        }

        #[test]
        fn sum_is_none_until_window_full() {
            let mut w = RollingWindow::new(3);
            w.push(10.0);
            assert_eq!(w.sum(), None);
            w.push(20.0);
            assert_eq!(w.sum(), None);
            w.push(30.0);
            assert_eq!(w.sum(), Some(60.0));
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn oldest_value_drops_on_push() {
            let mut w = RollingWindow::new(2);
            w.push(10.0);
            w.push(20.0);
            w.push(30.0);
            assert_eq!(w.sum(), Some(50.0));
        }

        #[test]
        fn slides_across_many_bars() {
            let mut w = RollingWindow::new(2);
            for p in [1.0, 2.0, 3.0, 4.0, 5.0] {
                w.push(p);
            }
            assert_eq!(w.sum(), Some(9.0));
        }
    }

    mod non_finite {
        use super::*;

        #[test]
        fn nan_reads_nan_while_inside_window() {
            let mut w = RollingWindow::new(3);
            w.push(1.0);
            w.push(f64::NAN);
            w.push(3.0);
            assert!(w.sum().unwrap().is_nan());
            assert!(w.has_non_finite());
            w.push(4.0);
            assert!(w.sum().unwrap().is_nan());
        }

        #[test]
        fn nan_clears_once_evicted() {
            let mut w = RollingWindow::new(3);
            for p in [1.0, f64::NAN, 3.0, 4.0, 5.0] {
                w.push(p);
            }
            assert!(!w.has_non_finite());
            assert_eq!(w.sum(), Some(12.0));
        }

        #[test]
        fn infinities_do_not_leave_residue() {
            let mut w = RollingWindow::new(2);
            for p in [f64::INFINITY, f64::NEG_INFINITY, 2.0] {
                w.push(p);
            }
            assert!(w.sum().unwrap().is_nan());
            w.push(5.0);
            assert_eq!(w.sum(), Some(7.0));
        }

        #[test]
        fn warm_up_is_unaffected() {
            let mut w = RollingWindow::new(3);
            w.push(f64::NAN);
            assert_eq!(w.sum(), None);
        }
    }

    mod sum_of_squares {
        use super::*;

        #[test]
        fn tracks_squares() {
            let mut w = RollingWindow::with_sum_of_squares(2);
            w.push(1.0);
            w.push(2.0);
            assert_eq!(w.sum_of_squares(), Some(5.0));
            w.push(3.0);
            // 2² + 3²
            assert_eq!(w.sum_of_squares(), Some(13.0));
        }

        #[test]
        fn nan_clears_from_squares_after_eviction() {
            let mut w = RollingWindow::with_sum_of_squares(2);
            w.push(1.0);
            w.push(f64::NAN);
            assert!(w.sum_of_squares().unwrap().is_nan());
            w.push(2.0);
            assert!(w.sum_of_squares().unwrap().is_nan());
            w.push(3.0);
            assert_eq!(w.sum_of_squares(), Some(13.0));
        }

        #[test]
        #[should_panic(expected = "sum_of_squares requires RollingWindow<true>")]
        fn plain_window_panics() {
            let w = RollingWindow::new(2);
            let _ = w.sum_of_squares();
        }
    }
}
