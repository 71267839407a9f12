//! ADX — Average Directional Index.
//!
//! Steps:
//! 1. +DM / -DM from consecutive bars: up = high[t]-high[t-1], down = low[t-1]-low[t];
//!    +DM = up when up > down and up > 0, else 0 (mirror for -DM)
//! 2. `Smoothing::Simple`: DI = 100 * rolling_sum(DM, n) / ATR(n) with a simple ATR
//!    `Smoothing::Wilder`: DI = 100 * wilder(DM) / wilder(TR)
//! 3. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 4. ADX = SMA(DX, n) or Wilder(DX, n)
//!
//! The simple form scales both DIs by n relative to the Wilder form; DX is a
//! ratio, so ADX is unaffected.
//! Zero ATR or a zero DI sum → NaN.
//! Lookback: 2n - 1 (n for DI, n - 1 more for ADX).

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::atr::{atr_series, true_range, wilder_smooth};
use crate::indicators::rolling::rolling_sum;
use crate::indicators::sma::sma_of_series;
use crate::indicators::Smoothing;

/// Aligned directional-movement outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub adx: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    smoothing: Smoothing,
    name: String,
}

impl Adx {
    pub fn new(period: usize, smoothing: Smoothing) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            smoothing,
            name: format!("adx_{period}"),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> AdxSeries {
        let n = bars.len();
        let (plus_dm, minus_dm) = directional_movement(bars);

        let (plus_num, minus_num, denom) = match self.smoothing {
            Smoothing::Simple => (
                rolling_sum(&plus_dm, self.period),
                rolling_sum(&minus_dm, self.period),
                atr_series(bars, self.period, Smoothing::Simple),
            ),
            Smoothing::Wilder => {
                let mut tr = true_range(bars);
                // Align the TR seed with the DM seed (both start at bar 1).
                if let Some(first) = tr.first_mut() {
                    *first = f64::NAN;
                }
                (
                    wilder_smooth(&plus_dm, self.period),
                    wilder_smooth(&minus_dm, self.period),
                    wilder_smooth(&tr, self.period),
                )
            }
        };

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];

        for i in 0..n {
            if denom[i].is_nan() || denom[i] == 0.0 || plus_num[i].is_nan() || minus_num[i].is_nan()
            {
                continue;
            }
            let p = 100.0 * plus_num[i] / denom[i];
            let m = 100.0 * minus_num[i] / denom[i];
            plus_di[i] = p;
            minus_di[i] = m;

            let di_sum = p + m;
            if di_sum != 0.0 {
                dx[i] = 100.0 * (p - m).abs() / di_sum;
            }
        }

        let adx = match self.smoothing {
            Smoothing::Simple => sma_of_series(&dx, self.period),
            Smoothing::Wilder => wilder_smooth(&dx, self.period),
        };

        AdxSeries {
            plus_di,
            minus_di,
            adx,
        }
    }
}

/// Signed directional movement per bar; index 0 is NaN.
///
/// At most one of +DM and -DM is non-zero on any bar. A move down in the
/// low is `low[t-1] - low[t]`, so a rising low never counts as -DM.
pub(crate) fn directional_movement(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
    let n = bars.len();
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;

        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }
    (plus_dm, minus_dm)
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.compute_all(bars).adx
    }
}
