//! PriceSeries — validated, time-ordered bars for one instrument.
//!
//! Validation happens once, at construction. Everything downstream indexes the
//! bars positionally (0 = oldest) and assumes the invariants hold.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::Bar;

/// Rejections raised while building a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index}: missing or non-finite {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("bar {index}: invalid volume {volume}")]
    InvalidVolume { index: usize, volume: f64 },

    #[error("bar {index}: high {high} is below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },

    #[error("bar {index}: duplicate date {date}")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index}: date {date} is earlier than previous bar {previous}")]
    NonMonotonic {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

/// Time-ordered OHLCV bars for a single symbol.
///
/// Invariants: dates strictly increase, OHLC values are finite, volume is
/// finite and non-negative, `high >= low`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap a bar vector. Bars are never reordered or dropped.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.missing_field() {
                return Err(SeriesError::MissingField { index, field });
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(SeriesError::InvalidVolume {
                    index,
                    volume: bar.volume,
                });
            }
            if bar.high < bar.low {
                return Err(SeriesError::InvertedRange {
                    index,
                    high: bar.high,
                    low: bar.low,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].date;
                if bar.date == previous {
                    return Err(SeriesError::DuplicateDate {
                        index,
                        date: bar.date,
                    });
                }
                if bar.date < previous {
                    return Err(SeriesError::NonMonotonic {
                        index,
                        previous,
                        date: bar.date,
                    });
                }
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The first `len` bars as a new series (clamped to the series length).
    ///
    /// A prefix of a valid series is valid, so no re-validation is needed.
    pub fn prefix(&self, len: usize) -> PriceSeries {
        let len = len.min(self.bars.len());
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..len].to_vec(),
        }
    }
}
