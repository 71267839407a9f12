//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::rolling::rolling_sum;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        sma_of_series(&closes, self.period)
    }
}

/// Arithmetic mean of the trailing `window` values of an arbitrary series.
///
/// NaN until `window` values exist, and wherever the window contains a NaN.
pub fn sma_of_series(values: &[f64], window: usize) -> Vec<f64> {
    let mut result = rolling_sum(values, window);
    if window > 0 {
        let w = window as f64;
        for v in result.iter_mut() {
            *v /= w;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_flat_bars, DEFAULT_EPSILON};

    #[test]
    fn mean_of_trailing_closes() {
        let bars = make_flat_bars(&[4.0, 8.0, 6.0, 2.0, 10.0]);
        let sma = Sma::new(3);
        let out = sma.compute(&bars);
        assert_eq!(sma.lookback(), 2);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_approx(out[2], 6.0, DEFAULT_EPSILON);
        assert_approx(out[3], 16.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(out[4], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn window_one_is_identity() {
        let values = [3.5, -1.0, 7.25];
        assert_eq!(sma_of_series(&values, 1), values.to_vec());
    }

    #[test]
    fn nan_poisons_only_windows_containing_it() {
        let out = sma_of_series(&[1.0, 2.0, f64::NAN, 4.0, 6.0, 8.0], 2);
        assert_approx(out[1], 1.5, DEFAULT_EPSILON);
        assert!(out[2].is_nan() && out[3].is_nan());
        assert_approx(out[4], 5.0, DEFAULT_EPSILON);
        assert_approx(out[5], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn shorter_than_window_is_undefined() {
        let out = sma_of_series(&[1.0, 2.0], 20);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
