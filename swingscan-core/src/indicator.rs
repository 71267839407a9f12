//! Indicator trait and named derived-series container.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! composer computes each one once per evaluation and reads the values it
//! needs by bar index.

use crate::domain::Bar;
use serde::Serialize;
use std::collections::BTreeMap;

/// Trait for single-series indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Positions before `lookback()` hold `f64::NAN` (warmup);
/// degenerate math (division by zero) also yields `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "atr_14").
    fn name(&self) -> &str;

    /// Index of the first bar that can hold a defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Derived series keyed by name, for inspection and reporting.
///
/// Ordered so that dumps and exports are stable across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndicatorValues {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Get the indicator value at a specific bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Last value of every series, NaN where undefined.
    pub fn latest(&self) -> BTreeMap<&str, f64> {
        self.series
            .iter()
            .map(|(k, v)| (k.as_str(), v.last().copied().unwrap_or(f64::NAN)))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_bar() {
        let mut iv = IndicatorValues::new();
        assert!(iv.is_empty());
        iv.insert("obv_sma", vec![f64::NAN, f64::NAN, 250.0]);
        iv.insert("ut_trail", vec![f64::NAN, 9.7, 10.1]);

        assert_eq!(iv.len(), 2);
        assert!(iv.get("obv_sma", 1).is_some_and(f64::is_nan));
        assert_eq!(iv.get("ut_trail", 2), Some(10.1));
        assert_eq!(iv.get("ut_trail", 3), None);
        assert_eq!(iv.get("cci", 0), None);
        assert_eq!(iv.get_series("obv_sma").map(<[f64]>::len), Some(3));
    }

    #[test]
    fn latest_is_nan_for_empty_series() {
        let mut iv = IndicatorValues::new();
        iv.insert("rsi", vec![f64::NAN, 55.0]);
        iv.insert("adx", Vec::new());
        let latest = iv.latest();
        assert_eq!(latest["rsi"], 55.0);
        assert!(latest["adx"].is_nan());
        assert_eq!(iv.names().collect::<Vec<_>>(), vec!["adx", "rsi"]);
    }
}
