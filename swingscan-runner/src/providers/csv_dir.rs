//! Daily bars from a directory of per-symbol CSV files.
//!
//! Layout: `<dir>/<SYMBOL>.csv` with header `date,open,high,low,close,volume`
//! and ISO dates. Rows outside the requested range are skipped; the rest must
//! already be in ascending date order.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use swingscan_core::data::{DataError, DataProvider};
use swingscan_core::domain::{Bar, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn read_bars(path: &Path, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::Parse {
                context: format!("{} row {}", path.display(), line + 1),
                message: e.to_string(),
            })?;
            if row.date < start || row.date > end {
                continue;
            }
            bars.push(Bar::new(row.date, row.open, row.high, row.low, row.close, row.volume));
        }
        Ok(bars)
    }
}

impl DataProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let bars = Self::read_bars(&path, start, end)?;
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
