//! Export and notification sinks.
//!
//! CSV export writes one row per decision. Condition columns are the sorted
//! union of condition names across all decisions, so a symbol evaluated with
//! a different condition set leaves its missing cells empty.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use swingscan_core::signals::Decision;
use swingscan_core::sink::{ExportSink, NotificationSink, SinkError};

/// Discord rejects message content longer than this.
pub const WEBHOOK_CONTENT_LIMIT: usize = 2000;

const FIXED_COLUMNS: [&str; 5] = ["symbol", "date", "signal", "score", "position_open"];

/// Render decisions as CSV text.
pub fn decisions_to_csv(decisions: &[Decision]) -> Result<String, SinkError> {
    let condition_names: BTreeSet<&str> = decisions
        .iter()
        .flat_map(|d| d.conditions.keys().map(String::as_str))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    let header = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(condition_names.iter().copied());
    wtr.write_record(header)
        .map_err(|e| SinkError::Serialize(e.to_string()))?;

    for d in decisions {
        let mut record = vec![
            d.symbol.clone(),
            d.date.map(|date| date.to_string()).unwrap_or_default(),
            d.signal.as_str().to_string(),
            d.score.to_string(),
            d.position_open.to_string(),
        ];
        record.extend(
            condition_names
                .iter()
                .map(|name| d.conditions.get(*name).map(bool::to_string).unwrap_or_default()),
        );
        wtr.write_record(&record)
            .map_err(|e| SinkError::Serialize(e.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SinkError::Serialize(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SinkError::Serialize(e.to_string()))
}

/// Writes the decision table to a file, replacing it.
#[derive(Debug, Clone)]
pub struct CsvExportSink {
    path: PathBuf,
}

impl CsvExportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ExportSink for CsvExportSink {
    fn export(&self, decisions: &[Decision]) -> Result<(), SinkError> {
        let csv = decisions_to_csv(decisions)?;
        let io_err = |e: std::io::Error| SinkError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, csv).map_err(io_err)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&self, message: &str) -> Result<(), SinkError> {
        println!("{message}");
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts `{"content": message}` to a chat webhook (Discord format).
pub struct WebhookSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self, SinkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SinkError::Delivery(format!("build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl std::fmt::Debug for WebhookSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL embeds the webhook token.
        f.debug_struct("WebhookSink").field("url", &"***").finish()
    }
}

/// Cut a message to at most `limit` characters on a char boundary.
pub fn truncate_message(message: &str, limit: usize) -> &str {
    match message.char_indices().nth(limit) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

impl NotificationSink for WebhookSink {
    fn notify(&self, message: &str) -> Result<(), SinkError> {
        let payload = WebhookPayload {
            content: truncate_message(message, WEBHOOK_CONTENT_LIMIT),
        };
        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| SinkError::Delivery(e.without_url().to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use swingscan_core::signals::Signal;

    fn decision(symbol: &str, signal: Signal, conditions: &[(&str, bool)]) -> Decision {
        Decision {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            signal,
            score: conditions.iter().filter(|(_, v)| *v).count(),
            conditions: conditions
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            position_open: false,
        }
    }

    #[test]
    fn csv_has_fixed_then_condition_columns() {
        let rows = vec![
            decision("AAPL", Signal::Buy, &[("ut_bot_buy", true), ("macd_bullish", true)]),
            decision("MSFT", Signal::None, &[("macd_bullish", false), ("adx_trending", true)]),
        ];
        let csv = decisions_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "symbol,date,signal,score,position_open,adx_trending,macd_bullish,ut_bot_buy"
        );
        assert_eq!(lines.next().unwrap(), "AAPL,2024-03-01,BUY,2,false,,true,true");
        assert_eq!(lines.next().unwrap(), "MSFT,2024-03-01,NONE,1,false,true,false,");
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = decisions_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "symbol,date,signal,score,position_open");
    }

    #[test]
    fn export_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvExportSink::new(dir.path().join("out/signals.csv"));
        sink.export(&[decision("SPY", Signal::Buy, &[("obv_accumulation", true)])])
            .unwrap();
        let written = std::fs::read_to_string(sink.path()).unwrap();
        assert!(written.starts_with("symbol,date,signal,score,position_open,obv_accumulation\n"));
        assert!(written.contains("SPY,2024-03-01,BUY,1,false,true"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_message("abcdef", 3), "abc");
        assert_eq!(truncate_message("abc", 10), "abc");
        assert_eq!(truncate_message("ééé", 2), "éé");
    }

    #[test]
    fn webhook_debug_hides_url() {
        let sink = WebhookSink::new("https://discord.com/api/webhooks/1/token").unwrap();
        assert!(!format!("{sink:?}").contains("token"));
    }
}
