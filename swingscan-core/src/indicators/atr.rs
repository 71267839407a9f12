//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); bar 0 has
//! no previous close and uses high-low alone.
//! ATR: simple moving average of TR (default) or Wilder smoothing (alpha = 1/period).
//! Lookback: period - 1 (the first TR value is usable).

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::sma::sma_of_series;
use crate::indicators::Smoothing;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    smoothing: Smoothing,
    name: String,
}

impl Atr {
    pub fn new(period: usize, smoothing: Smoothing) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            smoothing,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from bars.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    tr[0] = bars[0].high - bars[0].low;

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first `period` consecutive non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let seed_start = (0..=(n - period))
        .find(|&i| values[i..i + period].iter().all(|v| !v.is_nan()));

    let seed_start = match seed_start {
        Some(s) => s,
        None => return result,
    };

    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;

    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = prev + alpha * (values[i] - prev);
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// ATR of a bar slice with the given window and smoothing.
pub fn atr_series(bars: &[Bar], period: usize, smoothing: Smoothing) -> Vec<f64> {
    let tr = true_range(bars);
    match smoothing {
        Smoothing::Simple => sma_of_series(&tr, period),
        Smoothing::Wilder => wilder_smooth(&tr, period),
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        atr_series(bars, self.period, self.smoothing)
    }
}
