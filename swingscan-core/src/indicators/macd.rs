//! MACD — Moving Average Convergence Divergence.
//!
//! macd      = EMA(close, fast) - EMA(close, slow)
//! signal    = EMA(macd, signal)
//! histogram = macd - signal
//!
//! Lookback depends on the EMA seed: 0 with `EmaSeed::First`, otherwise
//! (slow - 1) for the macd line and (slow - 1) + (signal - 1) for signal/histogram.

use crate::domain::Bar;
use crate::indicator::Indicator;
use crate::indicators::ema::{ema_of_series, EmaSeed};

/// Which MACD line an `Indicator` instance reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

/// The three aligned MACD series.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    /// macd > signal, optionally also requiring macd < 0 (oversold reversal).
    /// False wherever either line is undefined.
    pub fn is_bullish(&self, i: usize, require_negative: bool) -> bool {
        let (m, s) = match (self.macd.get(i), self.signal.get(i)) {
            (Some(&m), Some(&s)) => (m, s),
            _ => return false,
        };
        m > s && (!require_negative || m < 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    seed: EmaSeed,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, seed: EmaSeed) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be below slow period");
        Self {
            fast,
            slow,
            signal,
            seed,
            line: MacdLine::Macd,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }

    /// Report a different line through the `Indicator` trait.
    pub fn with_line(mut self, line: MacdLine) -> Self {
        let (fast, slow, signal) = (self.fast, self.slow, self.signal);
        self.name = match line {
            MacdLine::Macd => format!("macd_{fast}_{slow}_{signal}"),
            MacdLine::Signal => format!("macd_signal_{fast}_{slow}_{signal}"),
            MacdLine::Histogram => format!("macd_hist_{fast}_{slow}_{signal}"),
        };
        self.line = line;
        self
    }

    pub fn compute_all(&self, bars: &[Bar]) -> MacdSeries {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        macd_of_series(&closes, self.fast, self.slow, self.signal, self.seed)
    }
}

/// MACD of an arbitrary series.
pub fn macd_of_series(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
    seed: EmaSeed,
) -> MacdSeries {
    let ema_fast = ema_of_series(values, fast, seed);
    let ema_slow = ema_of_series(values, slow, seed);

    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_of_series(&macd, signal, seed);
    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match (self.seed, self.line) {
            (EmaSeed::First, _) => 0,
            (EmaSeed::Sma, MacdLine::Macd) => self.slow - 1,
            (EmaSeed::Sma, _) => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let all = self.compute_all(bars);
        match self.line {
            MacdLine::Macd => all.macd,
            MacdLine::Signal => all.signal,
            MacdLine::Histogram => all.histogram,
        }
    }
}
