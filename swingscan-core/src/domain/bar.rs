//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// The symbol lives on the owning [`PriceSeries`](super::PriceSeries), not on
/// every bar. Volume is a float because some providers report fractional
/// (aggregated) volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar with open = high = low = close. Handy for close-only data.
    pub fn flat(date: NaiveDate, price: f64, volume: f64) -> Self {
        Self::new(date, price, price, price, price, volume)
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Name of the first OHLC field that is not a finite number.
    pub(crate) fn missing_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
            50_000.0,
        )
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let bar = sample_bar();
        assert!((bar.typical_price() - (105.0 + 98.0 + 103.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bar_direction() {
        let bar = sample_bar();
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());

        let flat = Bar::flat(bar.date, 10.0, 1.0);
        assert!(!flat.is_bullish());
        assert!(!flat.is_bearish());
    }

    #[test]
    fn missing_field_detects_nan() {
        let mut bar = sample_bar();
        assert_eq!(bar.missing_field(), None);
        bar.low = f64::NAN;
        assert_eq!(bar.missing_field(), Some("low"));
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
