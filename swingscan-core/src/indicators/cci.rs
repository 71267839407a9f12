//! Commodity Channel Index (CCI).
//!
//! tp  = (high + low + close) / 3
//! CCI = (tp - SMA(tp, n)) / (0.015 * deviation)
//!
//! Lookback: n - 1 for `MeanDeviation::Classic`, 2(n - 1) for `Residual`.
//! Zero deviation (flat window) → NaN.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::rolling::mean_abs_deviation;
use crate::indicators::sma::sma_of_series;
use serde::{Deserialize, Serialize};

/// Lambert's scaling constant.
pub const CCI_SCALE: f64 = 0.015;

/// Which deviation goes in the denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanDeviation {
    /// Mean |tp - mean(window)| over each window (the textbook definition).
    #[default]
    Classic,
    /// Rolling mean of |tp - SMA(tp)|, as some screeners compute it.
    Residual,
}

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    deviation: MeanDeviation,
    name: String,
}

impl Cci {
    pub fn new(period: usize, deviation: MeanDeviation) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            period,
            deviation,
            name: format!("cci_{period}"),
        }
    }
}

impl Indicator for Cci {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.deviation {
            MeanDeviation::Classic => self.period - 1,
            MeanDeviation::Residual => 2 * (self.period - 1),
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let tp: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
        let sma_tp = sma_of_series(&tp, self.period);

        let deviation = match self.deviation {
            MeanDeviation::Classic => mean_abs_deviation(&tp, self.period),
            MeanDeviation::Residual => {
                let residual: Vec<f64> = tp.iter().zip(&sma_tp).map(|(t, s)| (t - s).abs()).collect();
                sma_of_series(&residual, self.period)
            }
        };

        tp.iter()
            .zip(sma_tp.iter().zip(&deviation))
            .map(|(&t, (&mean, &dev))| {
                if dev.is_nan() || mean.is_nan() || dev == 0.0 {
                    f64::NAN
                } else {
                    (t - mean) / (CCI_SCALE * dev)
                }
            })
            .collect()
    }
}
