//! SwingScan Core — price series, technical indicators, signal composition.
//!
//! This crate is the pure, synchronous engine:
//! - Domain types (bars, validated price series)
//! - Indicators (ATR, MACD, RSI, Stochastic, CCI, ADX, OBV, UT Bot trailing stop)
//! - Signal composer (conditions, lookback-OR, scoring, FLAT/LONG replay)
//! - Engine configuration
//! - Collaborator traits for data sources, universes and output sinks
//!
//! It performs no I/O beyond reading config files on request.

pub mod config;
pub mod data;
pub mod domain;
pub mod indicator;
pub mod indicators;
pub mod signals;
pub mod sink;

pub use config::{ConfigError, EngineConfig, ScoringMode, Thresholds};
pub use domain::{Bar, PriceSeries, SeriesError};
pub use signals::{ConditionKind, Decision, Evaluation, Signal, SignalComposer, SignalTrigger};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across scan workers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();

        // Config and composer
        require_send::<config::EngineConfig>();
        require_sync::<config::EngineConfig>();
        require_send::<signals::SignalComposer>();
        require_sync::<signals::SignalComposer>();

        // Outputs
        require_send::<signals::Decision>();
        require_sync::<signals::Decision>();
        require_send::<signals::Evaluation>();
        require_sync::<signals::Evaluation>();
        require_send::<indicator::IndicatorValues>();
        require_sync::<indicator::IndicatorValues>();
        require_send::<signals::IndicatorSet>();
        require_sync::<signals::IndicatorSet>();

        // Errors cross thread boundaries in scan reports
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<sink::SinkError>();
        require_sync::<sink::SinkError>();
    }

    /// Architecture contract: collaborator traits are object safe, so the
    /// runner can select adapters at runtime.
    #[test]
    fn collaborator_traits_are_object_safe() {
        fn _providers(
            _data: &dyn data::DataProvider,
            _universe: &dyn data::UniverseProvider,
            _notify: &dyn sink::NotificationSink,
            _export: &dyn sink::ExportSink,
        ) {
        }
    }
}
