//! UT Bot — ATR trailing stop with cross events.
//!
//! Inherently sequential: every trail value depends on the previous one, so it
//! is computed as an explicit fold carrying (previous trail, previous close).
//!
//! loss = key * ATR(period). For bar t with previous trail P:
//! - no ATR yet (or bar 0):           trail = close - loss (NaN while loss is NaN)
//! - close and prev close above P:    trail = max(P, close - loss)   (ratchets up)
//! - close and prev close below P:    trail = min(P, close + loss)   (ratchets down)
//! - close above P (flip up):         trail = close - loss
//! - otherwise (flip down, or P NaN): trail = close + loss
//!
//! Buy  at t: close[t] > trail[t] and close[t-1] <= trail[t-1].
//! Sell at t: close[t] < trail[t] and close[t-1] >= trail[t-1].
//! Lookback: period - 1 for the trail, period for cross events.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::atr::atr_series;
use crate::indicators::Smoothing;

/// Trail line plus the bars where price crossed it.
#[derive(Debug, Clone, PartialEq)]
pub struct UtBotSeries {
    pub trail: Vec<f64>,
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct UtBot {
    atr_period: usize,
    key: f64,
    smoothing: Smoothing,
    name: String,
}

/// Fold state threaded through the recurrence.
#[derive(Debug, Clone, Copy)]
struct TrailState {
    trail: f64,
    close: f64,
}

impl UtBot {
    pub fn new(atr_period: usize, key: f64, smoothing: Smoothing) -> Self {
        assert!(atr_period >= 1, "UT Bot ATR period must be >= 1");
        assert!(key > 0.0, "UT Bot key must be > 0");
        Self {
            atr_period,
            key,
            smoothing,
            name: format!("ut_trail_{atr_period}_{key}"),
        }
    }

    pub fn compute_all(&self, bars: &[Bar]) -> UtBotSeries {
        let atr = atr_series(bars, self.atr_period, self.smoothing);
        self.compute_with_atr(bars, &atr)
    }

    /// Same as `compute_all`, reusing an ATR series computed by the caller.
    pub fn compute_with_atr(&self, bars: &[Bar], atr: &[f64]) -> UtBotSeries {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let trail = trail_of_series(&closes, atr, self.key);

        let n = closes.len();
        let mut buy = vec![false; n];
        let mut sell = vec![false; n];
        for i in 1..n {
            // NaN comparisons are false, so warmup bars never cross.
            buy[i] = closes[i] > trail[i] && closes[i - 1] <= trail[i - 1];
            sell[i] = closes[i] < trail[i] && closes[i - 1] >= trail[i - 1];
        }

        UtBotSeries { trail, buy, sell }
    }
}

/// Trailing-stop recurrence over closes and a precomputed ATR series.
pub fn trail_of_series(closes: &[f64], atr: &[f64], key: f64) -> Vec<f64> {
    let mut trail = Vec::with_capacity(closes.len());
    let mut prev: Option<TrailState> = None;

    for (&close, &atr) in closes.iter().zip(atr) {
        let loss = key * atr;

        let next = match prev {
            Some(p) if !atr.is_nan() => {
                if close > p.trail && p.close > p.trail {
                    p.trail.max(close - loss)
                } else if close < p.trail && p.close < p.trail {
                    p.trail.min(close + loss)
                } else if close > p.trail {
                    close - loss
                } else {
                    close + loss
                }
            }
            _ => close - loss,
        };

        trail.push(next);
        prev = Some(TrailState { trail: next, close });
    }

    trail
}

impl Indicator for UtBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.atr_period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.compute_all(bars).trail
    }
}
