//! On-Balance Volume and its moving average.
//!
//! OBV[0] = 0; each later bar adds its volume on an up close, subtracts it on
//! a down close and leaves the total unchanged otherwise.
//! The signal line is SMA(OBV, window). Lookback: 0 for OBV, window - 1 for the SMA.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::sma::sma_of_series;

#[derive(Debug, Clone, PartialEq)]
pub struct ObvSeries {
    pub obv: Vec<f64>,
    pub obv_sma: Vec<f64>,
}

impl ObvSeries {
    /// OBV strictly above its moving average. False while the average is undefined.
    pub fn is_accumulating(&self, i: usize) -> bool {
        match (self.obv.get(i), self.obv_sma.get(i)) {
            (Some(&obv), Some(&sma)) => obv > sma,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Obv {
    sma_window: usize,
    name: String,
}

impl Obv {
    pub fn new(sma_window: usize) -> Self {
        assert!(sma_window >= 1, "OBV SMA window must be >= 1");
        Self {
            sma_window,
            name: "obv".to_string(),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> ObvSeries {
        let obv = obv_of_bars(bars);
        let obv_sma = sma_of_series(&obv, self.sma_window);
        ObvSeries { obv, obv_sma }
    }
}

/// Running signed-volume total.
pub fn obv_of_bars(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut total = 0.0;
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev = bars[i - 1].close;
            if bar.close > prev {
                total += bar.volume;
            } else if bar.close < prev {
                total -= bar.volume;
            }
        }
        out.push(total);
    }
    out
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        obv_of_bars(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::indicators::{assert_approx, make_flat_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn bars_with_volume(data: &[(f64, f64)]) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(close, volume))| {
                Bar::flat(base + chrono::Duration::days(i as i64), close, volume)
            })
            .collect()
    }

    #[test]
    fn obv_accumulates_signed_volume() {
        let bars = bars_with_volume(&[
            (10.0, 500.0),
            (11.0, 100.0),
            (10.5, 40.0),
            (10.5, 70.0),
            (12.0, 10.0),
        ]);
        let obv = Obv::new(2).compute(&bars);
        assert_eq!(obv, vec![0.0, 100.0, 60.0, 60.0, 70.0]);
    }

    #[test]
    fn unchanged_close_contributes_nothing() {
        let bars = make_flat_bars(&[5.0; 6]);
        let all = Obv::new(3).compute_all(&bars);
        assert!(all.obv.iter().all(|&v| v == 0.0));
        // Equal to its average, so not accumulating
        assert!(!all.is_accumulating(5));
    }

    #[test]
    fn sma_line_and_accumulation() {
        let bars = bars_with_volume(&[
            (10.0, 100.0),
            (11.0, 100.0),
            (12.0, 100.0),
            (13.0, 100.0),
        ]);
        let all = Obv::new(3).compute_all(&bars);
        assert!(all.obv_sma[1].is_nan());
        assert!(!all.is_accumulating(1));
        assert_approx(all.obv_sma[3], 200.0, DEFAULT_EPSILON);
        assert!(all.is_accumulating(3));
    }

    #[test]
    fn out_of_range_index_is_false() {
        let all = Obv::new(3).compute_all(&[]);
        assert!(all.obv.is_empty());
        assert!(!all.is_accumulating(0));
    }
}
