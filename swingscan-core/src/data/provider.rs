//! Data provider traits and structured error types.
//!
//! `DataProvider` abstracts over data sources (CSV directory, HTTP API,
//! synthetic) so the scanner can swap implementations and mock for tests.

use crate::domain::{PriceSeries, SeriesError};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from provider for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no bars for {symbol} between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("invalid price series for {symbol}: {source}")]
    InvalidSeries {
        symbol: String,
        #[source]
        source: SeriesError,
    },

    #[error("universe error: {0}")]
    Universe(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    pub fn invalid_series(symbol: impl Into<String>, source: SeriesError) -> Self {
        DataError::InvalidSeries {
            symbol: symbol.into(),
            source,
        }
    }
}

/// Source of daily OHLCV history.
///
/// Implementations return a validated, date-ordered series covering
/// `start..=end` (or whatever part of it the source has).
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}

/// Source of the symbols to scan.
pub trait UniverseProvider: Send + Sync {
    fn symbols(&self) -> Result<Vec<String>, DataError>;
}
