//! Polygon.io daily aggregates over blocking HTTP.
//!
//! `GET {base}/v2/aggs/ticker/{T}/range/1/day/{from}/{to}?adjusted=true&sort=asc`
//! returns `results: [{t, o, h, l, c, v}]` with `t` in epoch milliseconds.
//! One request per symbol; no retry.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swingscan_core::data::{DataError, DataProvider};
use swingscan_core::domain::{Bar, PriceSeries};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Explicit credentials and endpoint for the Polygon adapter.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct PolygonConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// Keeps the key out of logs.
impl std::fmt::Debug for PolygonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default)]
    results: Option<Vec<Aggregate>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Aggregate {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

pub struct PolygonProvider {
    client: reqwest::blocking::Client,
    config: PolygonConfig,
}

impl PolygonProvider {
    pub fn new(config: PolygonConfig) -> Result<Self, DataError> {
        if config.api_key.trim().is_empty() {
            return Err(DataError::AuthenticationRequired(
                "Polygon API key is empty".into(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn aggs_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/v2/aggs/ticker/{symbol}/range/1/day/{start}/{end}\
             ?adjusted=true&sort=asc&limit=50000&apiKey={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key
        )
    }
}

/// Turn an aggregates response body into a validated series.
pub fn parse_aggregates(symbol: &str, body: &str) -> Result<PriceSeries, DataError> {
    let resp: AggsResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })?;

    // `results` is omitted entirely when the range has no sessions.
    let results = match (resp.results, resp.status.as_deref()) {
        (Some(r), _) => r,
        (None, Some("OK") | Some("DELAYED")) => Vec::new(),
        (None, status) => {
            return Err(DataError::ResponseFormatChanged(format!(
                "no results for {symbol} (status {})",
                status.unwrap_or("missing")
            )))
        }
    };

    let bars = results
        .into_iter()
        .map(|a| {
            let date = DateTime::from_timestamp_millis(a.t)
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("bad timestamp {} for {symbol}", a.t))
                })?
                .date_naive();
            Ok(Bar::new(date, a.o, a.h, a.l, a.c, a.v))
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    PriceSeries::new(symbol, bars).map_err(|e| DataError::invalid_series(symbol, e))
}

impl DataProvider for PolygonProvider {
    fn name(&self) -> &str {
        "polygon"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let url = self.aggs_url(symbol, start, end);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Polygon rejected the API key (HTTP {status})"
            )));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.without_url().to_string()))?;
        let series = parse_aggregates(symbol, &body)?;
        if series.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-02 and 2024-01-03, 05:00 UTC
    const BODY: &str = r#"{
        "ticker": "AAPL", "status": "OK", "resultsCount": 2,
        "results": [
            {"t": 1704171600000, "o": 187.15, "h": 188.44, "l": 183.89, "c": 185.64, "v": 82488700.0},
            {"t": 1704258000000, "o": 184.22, "h": 185.88, "l": 183.43, "c": 184.25, "v": 58414500}
        ]
    }"#;

    #[test]
    fn parses_aggregates() {
        let series = parse_aggregates("AAPL", BODY).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.bars()[1].close, 184.25);
        assert_eq!(series.bars()[1].volume, 58_414_500.0);
    }

    #[test]
    fn empty_range_parses_to_empty_series() {
        let series = parse_aggregates("ZZZZ", r#"{"status": "OK", "resultsCount": 0}"#).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn error_status_without_results_is_rejected() {
        let err = parse_aggregates("ZZZZ", r#"{"status": "ERROR", "error": "bad"}"#).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn garbage_body_is_an_error() {
        assert!(parse_aggregates("AAPL", "<html>").is_err());
    }

    #[test]
    fn url_shape_and_redacted_debug() {
        let provider = PolygonProvider::new(PolygonConfig {
            api_key: "secret".into(),
            base_url: "http://localhost:9/".into(),
        })
        .unwrap();
        let url = provider.aggs_url(
            "MSFT",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        assert!(url.starts_with(
            "http://localhost:9/v2/aggs/ticker/MSFT/range/1/day/2024-01-01/2024-06-30?adjusted=true&sort=asc"
        ));
        assert!(url.ends_with("apiKey=secret"));
        assert!(!format!("{:?}", provider.config).contains("secret"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = PolygonProvider::new(PolygonConfig {
            api_key: " ".into(),
            base_url: default_base_url(),
        });
        assert!(matches!(err, Err(DataError::AuthenticationRequired(_))));
    }
}
