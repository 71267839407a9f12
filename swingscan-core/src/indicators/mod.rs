//! Concrete indicator implementations.
//!
//! Single-series indicators implement the `Indicator` trait from
//! `crate::indicator`. Multi-series indicators (MACD, Stochastic, ADX, UT Bot,
//! OBV) expose a `compute_all` returning a struct of aligned series, plus a
//! per-line `Indicator` instance where a single line is useful on its own.
//!
//! Undefined positions (warmup, degenerate math) are `f64::NAN`.

pub mod adx;
pub mod atr;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod ut_bot;

pub use adx::{Adx, AdxSeries};
pub use atr::Atr;
pub use cci::{Cci, MeanDeviation};
pub use ema::{Ema, EmaSeed};
pub use macd::{Macd, MacdLine, MacdSeries};
pub use obv::{Obv, ObvSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticLine, StochasticSeries};
pub use ut_bot::{UtBot, UtBotSeries};

use serde::{Deserialize, Serialize};

/// Averaging used by ATR, RSI and ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Plain rolling mean over the window.
    #[default]
    Simple,
    /// Wilder's recursive mean (alpha = 1/period, seeded by a simple mean).
    Wilder,
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Bars with open = high = low = close.
#[cfg(test)]
pub fn make_flat_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::flat(base_date + chrono::Duration::days(i as i64), close, 1000.0))
        .collect()
}

/// Bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Bar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
