//! Relative Strength Index (RSI).
//!
//! Average gain / average loss of close-to-close changes, either as a plain
//! rolling mean (`Smoothing::Simple`) or Wilder-smoothed (`Smoothing::Wilder`).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (changes start at bar 1).
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → NaN.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::atr::wilder_smooth;
use crate::indicators::sma::sma_of_series;
use crate::indicators::Smoothing;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: Smoothing,
    name: String,
}

impl Rsi {
    pub fn new(period: usize, smoothing: Smoothing) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            smoothing,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];

        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let (avg_gain, avg_loss) = match self.smoothing {
            Smoothing::Simple => (
                sma_of_series(&gains, self.period),
                sma_of_series(&losses, self.period),
            ),
            Smoothing::Wilder => (
                wilder_smooth(&gains, self.period),
                wilder_smooth(&losses, self.period),
            ),
        };

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| compute_rsi(g, l))
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 && avg_gain == 0.0 {
        f64::NAN // no movement: the ratio is 0/0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
