//! The per-instrument outcome of one evaluation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    #[default]
    None,
    Buy,
    Sell,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::None => "NONE",
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal at the final bar, with the conditions that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub symbol: String,
    /// Date of the final bar; `None` for an empty series.
    pub date: Option<NaiveDate>,
    pub signal: Signal,
    /// Satisfied entry conditions at the final bar (after lookback relaxation).
    pub score: usize,
    pub conditions: BTreeMap<String, bool>,
    pub position_open: bool,
}

impl Decision {
    /// Decision for a series with no bars.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            date: None,
            signal: Signal::None,
            score: 0,
            conditions: BTreeMap::new(),
            position_open: false,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.signal != Signal::None
    }

    /// Names of the conditions that held, in key order.
    pub fn satisfied(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .filter(|(_, &v)| v)
            .map(|(k, _)| k.as_str())
    }
}
