//! Scan configuration loaded from TOML.
//!
//! ```toml
//! history_days = 365
//! min_bars = 200
//! threads = 0
//!
//! [engine]
//! min_conditions = 4
//!
//! [data]
//! source = "polygon"          # or "csv_dir" (with dir = "...") or "synthetic"
//! api_key_env = "POLYGON_API_KEY"
//!
//! [universe]
//! file = "sp500.txt"
//!
//! [export]
//! csv = "out/signals.csv"
//!
//! [notify]
//! webhook_url = "https://discord.com/api/webhooks/..."
//! ```

use crate::providers::{polygon, CsvDirProvider, PolygonConfig, PolygonProvider, SyntheticProvider};
use crate::scan::ScanOptions;
use crate::sinks::{CsvExportSink, StdoutSink, WebhookSink};
use crate::universe::{FileUniverse, StaticUniverse};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swingscan_core::data::{DataError, DataProvider, UniverseProvider};
use swingscan_core::sink::{ExportSink, NotificationSink, SinkError};
use swingscan_core::{ConfigError, EngineConfig};

pub const DEFAULT_HISTORY_DAYS: i64 = 365;
/// Upper bound on `history_days` (about a century of calendar days).
pub const MAX_HISTORY_DAYS: i64 = 36_500;
pub const DEFAULT_MIN_BARS: usize = 200;
pub const DEFAULT_API_KEY_ENV: &str = "POLYGON_API_KEY";

/// Where bars come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSourceConfig {
    CsvDir {
        dir: PathBuf,
    },
    Polygon {
        /// Inline key; takes precedence over `api_key_env`.
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_base_url")]
        base_url: String,
    },
    #[default]
    Synthetic,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_base_url() -> String {
    polygon::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub symbols: Vec<String>,
    /// Plain list or `.toml` sector map; wins over `symbols`.
    pub file: Option<PathBuf>,
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub stdout: bool,
    pub webhook_url: Option<String>,
    /// Only rows scoring at least this much are included in the message.
    pub min_score: Option<usize>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            webhook_url: None,
            min_score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub engine: EngineConfig,
    pub data: DataSourceConfig,
    pub universe: UniverseConfig,
    pub export: ExportConfig,
    pub notify: NotifyConfig,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub history_days: i64,
    pub min_bars: usize,
    /// Worker threads; 0 uses the rayon default.
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            data: DataSourceConfig::default(),
            universe: UniverseConfig::default(),
            export: ExportConfig::default(),
            notify: NotifyConfig::default(),
            start: None,
            end: None,
            history_days: DEFAULT_HISTORY_DAYS,
            min_bars: DEFAULT_MIN_BARS,
            threads: 0,
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.history_days < 1 {
            return Err(ConfigError::ZeroWindow {
                field: "history_days",
            });
        }
        if self.history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::Parse(format!(
                "history_days {} exceeds the maximum of {MAX_HISTORY_DAYS}",
                self.history_days
            )));
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ConfigError::Parse(format!(
                    "start {start} is after end {end}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the fetch window: explicit dates win, otherwise
    /// `history_days` calendar days ending at `today`.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        let end = self.end.unwrap_or(today);
        let start = match self.start {
            Some(start) => start,
            None => history_start(end, self.history_days)?,
        };
        Ok((start, end))
    }

    pub fn scan_options(&self, today: NaiveDate) -> Result<ScanOptions, ConfigError> {
        let (start, end) = self.date_range(today)?;
        Ok(ScanOptions {
            start,
            end,
            min_bars: self.min_bars,
            threads: self.threads,
        })
    }

    /// Content hash of the configuration, for tagging reports.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// Polygon credentials, reading the key from the environment when not inline.
    pub fn polygon_config(&self) -> Result<Option<PolygonConfig>, DataError> {
        let DataSourceConfig::Polygon {
            api_key,
            api_key_env,
            base_url,
        } = &self.data
        else {
            return Ok(None);
        };
        let api_key = match api_key {
            Some(key) => key.clone(),
            None => std::env::var(api_key_env).map_err(|_| {
                DataError::AuthenticationRequired(format!(
                    "no api_key in [data] and ${api_key_env} is not set"
                ))
            })?,
        };
        Ok(Some(PolygonConfig {
            api_key,
            base_url: base_url.clone(),
        }))
    }

    pub fn build_provider(&self) -> Result<Box<dyn DataProvider>, DataError> {
        match &self.data {
            DataSourceConfig::CsvDir { dir } => Ok(Box::new(CsvDirProvider::new(dir))),
            DataSourceConfig::Synthetic => Ok(Box::new(SyntheticProvider::new())),
            DataSourceConfig::Polygon { .. } => {
                let config = self.polygon_config()?.ok_or_else(|| {
                    DataError::Other("polygon source without polygon settings".into())
                })?;
                Ok(Box::new(PolygonProvider::new(config)?))
            }
        }
    }

    pub fn build_universe(&self) -> Result<Box<dyn UniverseProvider>, DataError> {
        let u = &self.universe;
        match &u.file {
            Some(path) => {
                let file = FileUniverse::new(path);
                Ok(Box::new(match &u.sector {
                    Some(sector) => file.with_sector(sector),
                    None => file,
                }))
            }
            None if u.symbols.is_empty() => Err(DataError::Universe(
                "[universe] needs `symbols` or `file`".into(),
            )),
            None => Ok(Box::new(StaticUniverse::new(&u.symbols))),
        }
    }

    pub fn build_export_sinks(&self) -> Vec<Box<dyn ExportSink>> {
        self.export
            .csv
            .iter()
            .map(|path| Box::new(CsvExportSink::new(path)) as Box<dyn ExportSink>)
            .collect()
    }

    pub fn build_notification_sinks(&self) -> Result<Vec<Box<dyn NotificationSink>>, SinkError> {
        let mut sinks: Vec<Box<dyn NotificationSink>> = Vec::new();
        if self.notify.stdout {
            sinks.push(Box::new(StdoutSink));
        }
        if let Some(url) = &self.notify.webhook_url {
            sinks.push(Box::new(WebhookSink::new(url)?));
        }
        Ok(sinks)
    }
}

/// `days` calendar days before `end`, or an error when that leaves the
/// representable date range.
pub fn history_start(end: NaiveDate, days: i64) -> Result<NaiveDate, ConfigError> {
    u64::try_from(days)
        .ok()
        .and_then(|days| end.checked_sub_days(Days::new(days)))
        .ok_or_else(|| {
            ConfigError::Parse(format!("history of {days} days before {end} is out of range"))
        })
}
