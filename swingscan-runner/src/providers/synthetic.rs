//! Deterministic random-walk bars for offline runs and tests.
//!
//! Each symbol gets its own reproducible walk: the RNG is seeded from the
//! BLAKE3 hash of the symbol name. Weekends are skipped; holidays are not.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swingscan_core::data::{DataError, DataProvider};
use swingscan_core::domain::{Bar, PriceSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProvider {
    pub start_price: f64,
    /// Maximum absolute daily return.
    pub daily_range: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            daily_range: 0.03,
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bars(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-self.daily_range..self.daily_range);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64) as f64;

            bars.push(Bar::new(current, open, high, low, close, volume));
            price = close;
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let bars = self.bars(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        PriceSeries::new(symbol, bars).map_err(|e| DataError::invalid_series(symbol, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_symbol_same_bars() {
        let p = SyntheticProvider::new();
        let a = p.fetch("SPY", d(2024, 1, 1), d(2024, 3, 31)).unwrap();
        let b = p.fetch("SPY", d(2024, 1, 1), d(2024, 3, 31)).unwrap();
        assert_eq!(a, b);

        let other = p.fetch("QQQ", d(2024, 1, 1), d(2024, 3, 31)).unwrap();
        let closes = |s: &PriceSeries| s.bars().iter().map(|b| b.close).collect::<Vec<f64>>();
        assert_ne!(closes(&a), closes(&other));
    }

    #[test]
    fn weekdays_only_and_valid_ohlc() {
        let series = SyntheticProvider::new()
            .fetch("AAPL", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap();
        assert_eq!(series.len(), 23);
        for bar in series.bars() {
            assert!(!matches!(bar.date.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.volume >= 500_000.0);
        }
    }

    #[test]
    fn weekend_only_range_is_no_data() {
        let err = SyntheticProvider::new()
            .fetch("AAPL", d(2024, 1, 6), d(2024, 1, 7))
            .unwrap_err();
        assert!(matches!(err, DataError::NoData { .. }));
    }
}
