//! Stochastic oscillator.
//!
//! raw %K = 100 * (close - lowest_low(n)) / (highest_high(n) - lowest_low(n))
//! %K     = SMA(raw %K, k_smoothing)   (k_smoothing = 1 → fast stochastic)
//! %D     = SMA(%K, d_period)
//!
//! A flat window (highest_high == lowest_low) leaves raw %K undefined at that
//! bar, and every smoothed value whose window touches it.
//! Lookback: (n - 1) + (k_smoothing - 1) for %K, plus (d_period - 1) for %D.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::rolling::{rolling_max, rolling_min};
use crate::indicators::sma::sma_of_series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

/// Aligned %K and %D series.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

impl StochasticSeries {
    /// %K above %D, optionally with %K below `max_k`. False on undefined values.
    pub fn is_bullish(&self, i: usize, max_k: Option<f64>) -> bool {
        let (k, d) = match (self.k.get(i), self.d.get(i)) {
            (Some(&k), Some(&d)) => (k, d),
            _ => return false,
        };
        k > d && max_k.map_or(true, |max| k < max)
    }
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    k_smoothing: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(period: usize, k_smoothing: usize, d_period: usize) -> Self {
        assert!(
            period >= 1 && k_smoothing >= 1 && d_period >= 1,
            "Stochastic periods must be >= 1"
        );
        Self {
            period,
            k_smoothing,
            d_period,
            line: StochasticLine::K,
            name: format!("stoch_k_{period}_{k_smoothing}"),
        }
    }

    pub fn with_line(mut self, line: StochasticLine) -> Self {
        self.name = match line {
            StochasticLine::K => format!("stoch_k_{}_{}", self.period, self.k_smoothing),
            StochasticLine::D => format!(
                "stoch_d_{}_{}_{}",
                self.period, self.k_smoothing, self.d_period
            ),
        };
        self.line = line;
        self
    }

    pub fn compute_all(&self, bars: &[Bar]) -> StochasticSeries {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highest = rolling_max(&highs, self.period);
        let lowest = rolling_min(&lows, self.period);

        let raw_k: Vec<f64> = bars
            .iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(bar, (&hh, &ll))| {
                let range = hh - ll;
                if range.is_nan() || range == 0.0 {
                    f64::NAN
                } else {
                    100.0 * (bar.close - ll) / range
                }
            })
            .collect();

        let k = sma_of_series(&raw_k, self.k_smoothing);
        let d = sma_of_series(&k, self.d_period);
        StochasticSeries { k, d }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k = self.period + self.k_smoothing - 2;
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => k + self.d_period - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let all = self.compute_all(bars);
        match self.line {
            StochasticLine::K => all.k,
            StochasticLine::D => all.d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_flat_bars, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn fast_k_known_value() {
        let bars = make_ohlc_bars(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 14.0, 10.0, 13.0),
            (13.0, 13.5, 9.0, 10.0),
        ]);
        let all = Stochastic::new(3, 1, 2).compute_all(&bars);
        // highest 14, lowest 8, close 10 → 100 * 2 / 6
        assert!(all.k[1].is_nan());
        assert_approx(all.k[2], 100.0 * 2.0 / 6.0, DEFAULT_EPSILON);
        assert!(all.d[2].is_nan());
    }

    #[test]
    fn d_is_sma_of_k() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + (i as f64 * 0.9).sin() * 5.0).collect();
        let bars = crate::indicators::make_bars(&closes);
        let all = Stochastic::new(5, 1, 3).compute_all(&bars);
        for i in 6..20 {
            let expected = (all.k[i] + all.k[i - 1] + all.k[i - 2]) / 3.0;
            assert_approx(all.d[i], expected, 1e-9);
        }
    }

    #[test]
    fn flat_range_is_undefined() {
        let bars = make_flat_bars(&[10.0; 10]);
        let all = Stochastic::new(3, 1, 2).compute_all(&bars);
        assert!(all.k.iter().all(|v| v.is_nan()));
        assert!(all.d.iter().all(|v| v.is_nan()));
        assert!(!all.is_bullish(9, None));
    }

    #[test]
    fn bullish_respects_max_k() {
        let s = StochasticSeries {
            k: vec![60.0],
            d: vec![40.0],
        };
        assert!(s.is_bullish(0, None));
        assert!(!s.is_bullish(0, Some(50.0)));
        assert!(s.is_bullish(0, Some(80.0)));
    }

    #[test]
    fn k_stays_in_range() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).cos() * 8.0).collect();
        let bars = crate::indicators::make_bars(&closes);
        let all = Stochastic::new(8, 5, 3).compute_all(&bars);
        for v in all.k.iter().chain(&all.d).filter(|v| !v.is_nan()) {
            assert!((-1e-9..=100.0 + 1e-9).contains(v), "out of range: {v}");
        }
    }

    #[test]
    fn stochastic_lookback() {
        let s = Stochastic::new(14, 1, 3);
        assert_eq!(s.lookback(), 13);
        assert_eq!(s.with_line(StochasticLine::D).lookback(), 15);
        assert_eq!(Stochastic::new(8, 5, 3).lookback(), 11);
    }
}
