//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1),
//! evaluated as EMA[t-1] + alpha * (x[t] - EMA[t-1]) so a constant input stays exact.
//!
//! Two seeds are in common use and both are selectable:
//! - `EmaSeed::First`: EMA starts at the first defined value,
//!   so there is no warmup gap. Lookback: 0.
//! - `EmaSeed::Sma`: EMA[span-1] = SMA of the first `span` values. Lookback: span - 1.

use crate::domain::Bar;
use crate::indicator::Indicator;
use serde::{Deserialize, Serialize};

/// How the recursion is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaSeed {
    /// Seed with the first defined value.
    #[default]
    First,
    /// Seed with the mean of the first `span` defined values.
    Sma,
}

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    seed: EmaSeed,
    name: String,
}

impl Ema {
    pub fn new(period: usize, seed: EmaSeed) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            seed,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.seed {
            EmaSeed::First => 0,
            EmaSeed::Sma => self.period.saturating_sub(1),
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period, self.seed)
    }
}

/// Compute EMA values from an arbitrary f64 slice.
///
/// Leading NaNs are skipped: the seed is taken at the first defined value, so
/// an EMA of an EMA-derived series (e.g. the MACD signal line) works without
/// special-casing. A NaN after the seed taints every later value.
pub fn ema_of_series(values: &[f64], span: usize, seed: EmaSeed) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 {
        return result;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(idx) => idx,
        None => return result,
    };

    if span == 1 {
        // alpha = 1: the EMA is the input itself
        for i in start..n {
            if values[i].is_nan() {
                return result;
            }
            result[i] = values[i];
        }
        return result;
    }

    let (seed_index, seed_value) = match seed {
        EmaSeed::First => (start, values[start]),
        EmaSeed::Sma => {
            let end = start + span;
            if end > n {
                return result;
            }
            let window = &values[start..end];
            if window.iter().any(|v| v.is_nan()) {
                return result;
            }
            (end - 1, window.iter().sum::<f64>() / span as f64)
        }
    };
    result[seed_index] = seed_value;

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = seed_value;
    for i in (seed_index + 1)..n {
        if values[i].is_nan() {
            // NaN propagates: once we see NaN, subsequent values are tainted
            return result;
        }
        let ema = prev + alpha * (values[i] - prev);
        result[i] = ema;
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        for seed in [EmaSeed::First, EmaSeed::Sma] {
            let result = Ema::new(1, seed).compute(&bars);
            assert_approx(result[0], 100.0, DEFAULT_EPSILON);
            assert_approx(result[1], 200.0, DEFAULT_EPSILON);
            assert_approx(result[2], 300.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_sma_seed_known_values() {
        // alpha = 0.5, seed at index 2: SMA(10,11,12) = 11
        // EMA[3] = 0.5*13 + 0.5*11 = 12, EMA[4] = 0.5*14 + 0.5*12 = 13
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3, EmaSeed::Sma).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_first_seed_known_values() {
        // alpha = 0.5, seed 10: 10, 10.5, 11.25, 12.125
        let result = ema_of_series(&[10.0, 11.0, 12.0, 13.0], 3, EmaSeed::First);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_skips_leading_nan() {
        let result = ema_of_series(&[f64::NAN, f64::NAN, 4.0, 6.0], 3, EmaSeed::First);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);

        let sma_seeded = ema_of_series(&[f64::NAN, 1.0, 2.0, 3.0, 4.0], 3, EmaSeed::Sma);
        assert!(sma_seeded[2].is_nan());
        assert_approx(sma_seeded[3], 2.0, DEFAULT_EPSILON);
        assert_approx(sma_seeded[4], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_in_seed_produces_all_nan() {
        let result = ema_of_series(&[10.0, f64::NAN, 12.0, 13.0, 14.0], 3, EmaSeed::Sma);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_nan_after_seed_propagates() {
        let result = ema_of_series(&[10.0, 11.0, 12.0, f64::NAN, 14.0], 3, EmaSeed::Sma);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(20, EmaSeed::Sma).lookback(), 19);
        assert_eq!(Ema::new(20, EmaSeed::First).lookback(), 0);
        assert_eq!(Ema::new(1, EmaSeed::Sma).lookback(), 0);
    }

    #[test]
    fn ema_of_series_matches_indicator() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let indicator_result = Ema::new(3, EmaSeed::Sma).compute(&bars);
        let series_result = ema_of_series(&closes, 3, EmaSeed::Sma);
        for i in 0..6 {
            if indicator_result[i].is_nan() {
                assert!(series_result[i].is_nan());
            } else {
                assert_approx(indicator_result[i], series_result[i], DEFAULT_EPSILON);
            }
        }
    }
}
