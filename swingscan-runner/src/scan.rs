//! Multi-instrument scan: fetch, evaluate and collect, one symbol per task.
//!
//! Symbols are evaluated in parallel on a rayon pool. A failed fetch is
//! recorded in the report and never aborts the other symbols. Output order
//! follows the universe order regardless of scheduling.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Write as _;
use swingscan_core::data::{DataError, DataProvider, UniverseProvider};
use swingscan_core::sink::{ExportSink, NotificationSink};
use swingscan_core::{ConfigError, Decision, SignalComposer};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to resolve universe: {0}")]
    Universe(#[source] DataError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Series shorter than this are still evaluated but flagged.
    pub min_bars: usize,
    /// 0 = rayon default.
    pub threads: usize,
}

/// One successfully evaluated symbol.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub symbol: String,
    pub decision: Decision,
    pub bars: usize,
    pub insufficient_history: bool,
}

#[derive(Debug)]
pub struct ScanFailure {
    pub symbol: String,
    pub error: DataError,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub outcomes: Vec<ScanOutcome>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Outcomes whose decision is BUY or SELL.
    pub fn signals(&self) -> impl Iterator<Item = &ScanOutcome> {
        self.outcomes.iter().filter(|o| o.decision.is_actionable())
    }

    /// Outcomes scoring at least `min_score`, highest score first.
    pub fn passing(&self, min_score: usize) -> Vec<&ScanOutcome> {
        let mut rows: Vec<&ScanOutcome> = self
            .outcomes
            .iter()
            .filter(|o| o.decision.score >= min_score)
            .collect();
        // stable: ties keep universe order
        rows.sort_by(|a, b| b.decision.score.cmp(&a.decision.score));
        rows
    }

    pub fn decisions(&self) -> Vec<Decision> {
        self.outcomes.iter().map(|o| o.decision.clone()).collect()
    }

    /// Plain-text summary for notification sinks.
    pub fn format_message(&self, min_score: Option<usize>) -> String {
        let rows: Vec<&ScanOutcome> = match min_score {
            Some(min) => self.passing(min),
            None => self.signals().collect(),
        };

        let mut msg = format!(
            "Swing scan: {} signal(s) from {} symbol(s)",
            rows.len(),
            self.outcomes.len()
        );
        if !self.failures.is_empty() {
            let _ = write!(msg, ", {} failed", self.failures.len());
        }
        for o in rows {
            let date = o
                .decision
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let satisfied: Vec<&str> = o.decision.satisfied().collect();
            let _ = write!(
                msg,
                "\n{} {} {} score={} [{}]",
                o.symbol,
                o.decision.signal,
                date,
                o.decision.score,
                satisfied.join(", ")
            );
            if o.insufficient_history {
                msg.push_str(" (short history)");
            }
        }
        msg
    }

    /// Push the decision table to every export sink, logging failures.
    /// Returns the number of sinks that failed.
    pub fn export_to(&self, sinks: &[Box<dyn ExportSink>]) -> usize {
        let decisions = self.decisions();
        sinks
            .iter()
            .filter(|sink| match sink.export(&decisions) {
                Ok(()) => false,
                Err(e) => {
                    warn!(error = %e, "export failed");
                    true
                }
            })
            .count()
    }

    /// Send the summary to every notification sink, logging failures.
    /// Returns the number of sinks that failed.
    pub fn notify_to(&self, sinks: &[Box<dyn NotificationSink>], min_score: Option<usize>) -> usize {
        let message = self.format_message(min_score);
        sinks
            .iter()
            .filter(|sink| match sink.notify(&message) {
                Ok(()) => false,
                Err(e) => {
                    warn!(error = %e, "notification failed");
                    true
                }
            })
            .count()
    }
}

fn scan_symbol(
    composer: &SignalComposer,
    provider: &dyn DataProvider,
    symbol: &str,
    opts: &ScanOptions,
) -> Result<ScanOutcome, DataError> {
    let series = provider.fetch(symbol, opts.start, opts.end)?;
    let decision = composer.decide(&series);
    debug!(
        symbol,
        signal = %decision.signal,
        score = decision.score,
        bars = series.len(),
        "evaluated"
    );
    Ok(ScanOutcome {
        symbol: symbol.to_string(),
        decision,
        bars: series.len(),
        insufficient_history: series.len() < opts.min_bars,
    })
}

/// Evaluate every symbol of the universe.
pub fn run_scan(
    composer: &SignalComposer,
    provider: &dyn DataProvider,
    universe: &dyn UniverseProvider,
    opts: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let symbols = universe.symbols().map_err(ScanError::Universe)?;
    info!(
        symbols = symbols.len(),
        provider = provider.name(),
        start = %opts.start,
        end = %opts.end,
        "scan started"
    );

    let evaluate = || -> Vec<Result<ScanOutcome, ScanFailure>> {
        symbols
            .par_iter()
            .map(|symbol| {
                scan_symbol(composer, provider, symbol, opts).map_err(|error| ScanFailure {
                    symbol: symbol.clone(),
                    error,
                })
            })
            .collect()
    };

    let results = if opts.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;
        pool.install(evaluate)
    } else {
        evaluate()
    };

    let mut report = ScanReport::default();
    for result in results {
        match result {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(failure) => {
                warn!(symbol = %failure.symbol, error = %failure.error, "symbol failed");
                report.failures.push(failure);
            }
        }
    }

    info!(
        evaluated = report.outcomes.len(),
        failed = report.failures.len(),
        signals = report.signals().count(),
        "scan finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SyntheticProvider;
    use crate::universe::StaticUniverse;
    use std::sync::{Arc, Mutex};
    use swingscan_core::domain::PriceSeries;
    use swingscan_core::sink::SinkError;
    use swingscan_core::{EngineConfig, Signal};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn opts(threads: usize) -> ScanOptions {
        ScanOptions {
            start: d(2023, 1, 1),
            end: d(2023, 12, 31),
            min_bars: 200,
            threads,
        }
    }

    /// Fails for one symbol, delegates to the synthetic walk otherwise.
    struct FlakyProvider {
        bad: &'static str,
    }

    impl DataProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
            if symbol == self.bad {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            SyntheticProvider::new().fetch(symbol, start, end)
        }
    }

    #[derive(Default, Clone)]
    struct Collecting {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl NotificationSink for Collecting {
        fn notify(&self, message: &str) -> Result<(), SinkError> {
            self.messages
                .lock()
                .map_err(|e| SinkError::Delivery(e.to_string()))?
                .push(message.to_string());
            Ok(())
        }
    }

    struct Refusing;

    impl NotificationSink for Refusing {
        fn notify(&self, _message: &str) -> Result<(), SinkError> {
            Err(SinkError::Rejected { status: 429 })
        }
    }

    #[test]
    fn failure_does_not_abort_scan() {
        let composer = SignalComposer::new(EngineConfig::default()).unwrap();
        let universe = StaticUniverse::new(["AAPL", "BAD", "MSFT", "SPY"]);
        let report = run_scan(&composer, &FlakyProvider { bad: "BAD" }, &universe, &opts(2)).unwrap();

        let symbols: Vec<&str> = report.outcomes.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "SPY"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].symbol, "BAD");
        assert!(matches!(report.failures[0].error, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let composer = SignalComposer::new(EngineConfig::default()).unwrap();
        let universe = StaticUniverse::new(["AAPL", "MSFT", "NVDA", "SPY", "QQQ", "IWM"]);
        let provider = SyntheticProvider::new();
        let serial = run_scan(&composer, &provider, &universe, &opts(1)).unwrap();
        let parallel = run_scan(&composer, &provider, &universe, &opts(0)).unwrap();
        assert_eq!(serial.decisions(), parallel.decisions());
    }

    #[test]
    fn short_history_is_flagged_not_dropped() {
        let composer = SignalComposer::new(EngineConfig::default()).unwrap();
        let universe = StaticUniverse::new(["AAPL"]);
        let short = ScanOptions {
            start: d(2023, 11, 1),
            ..opts(0)
        };
        let report = run_scan(&composer, &SyntheticProvider::new(), &universe, &short).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].insufficient_history);

        let full = run_scan(&composer, &SyntheticProvider::new(), &universe, &opts(0)).unwrap();
        assert!(!full.outcomes[0].insufficient_history);
    }

    fn outcome(symbol: &str, signal: Signal, score: usize) -> ScanOutcome {
        let mut decision = Decision::empty(symbol);
        decision.signal = signal;
        decision.score = score;
        decision.date = Some(d(2024, 5, 3));
        decision.conditions.insert("macd_bullish".into(), score > 0);
        ScanOutcome {
            symbol: symbol.to_string(),
            decision,
            bars: 250,
            insufficient_history: false,
        }
    }

    #[test]
    fn passing_sorts_by_score() {
        let report = ScanReport {
            outcomes: vec![
                outcome("AAA", Signal::None, 2),
                outcome("BBB", Signal::Buy, 4),
                outcome("CCC", Signal::None, 3),
                outcome("DDD", Signal::Buy, 4),
            ],
            failures: vec![],
        };
        let rows: Vec<&str> = report.passing(3).iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(rows, vec!["BBB", "DDD", "CCC"]);
        assert_eq!(report.signals().count(), 2);
    }

    #[test]
    fn message_lists_signals_and_failures() {
        let report = ScanReport {
            outcomes: vec![outcome("AAA", Signal::None, 1), outcome("BBB", Signal::Buy, 4)],
            failures: vec![ScanFailure {
                symbol: "ZZZ".into(),
                error: DataError::Other("boom".into()),
            }],
        };
        let msg = report.format_message(None);
        assert!(msg.starts_with("Swing scan: 1 signal(s) from 2 symbol(s), 1 failed"));
        assert!(msg.contains("BBB BUY 2024-05-03 score=4 [macd_bullish]"));
        assert!(!msg.contains("AAA"));
    }

    #[test]
    fn sink_failures_are_counted_not_fatal() {
        let report = ScanReport {
            outcomes: vec![outcome("BBB", Signal::Buy, 4)],
            failures: vec![],
        };
        let sinks: Vec<Box<dyn NotificationSink>> =
            vec![Box::new(Refusing), Box::new(Collecting::default())];
        assert_eq!(report.notify_to(&sinks, None), 1);
        assert_eq!(report.notify_to(&[], Some(4)), 0);
    }

    #[test]
    fn notification_carries_the_summary() {
        let report = ScanReport {
            outcomes: vec![outcome("BBB", Signal::Buy, 4), outcome("CCC", Signal::None, 3)],
            failures: vec![],
        };
        let collecting = Collecting::default();
        let sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(collecting.clone())];
        assert_eq!(report.notify_to(&sinks, Some(3)), 0);
        let messages = collecting.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("2 signal(s)"));
        assert!(messages[0].contains("CCC NONE"));
    }
}
