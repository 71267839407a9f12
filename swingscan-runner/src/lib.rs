//! SwingScan Runner — multi-instrument scans on top of `swingscan-core`.
//!
//! This crate provides:
//! - Data providers: CSV directory, Polygon.io daily aggregates, synthetic walk
//! - Universe providers: inline lists and list / sector-map files
//! - Parallel scan with per-symbol failure isolation
//! - CSV export, stdout and webhook notification sinks
//! - TOML scan configuration wiring all of the above

pub mod config;
pub mod providers;
pub mod scan;
pub mod sinks;
pub mod universe;

pub use config::{DataSourceConfig, ScanConfig};
pub use providers::{CsvDirProvider, PolygonConfig, PolygonProvider, SyntheticProvider};
pub use scan::{run_scan, ScanError, ScanFailure, ScanOptions, ScanOutcome, ScanReport};
pub use sinks::{decisions_to_csv, CsvExportSink, StdoutSink, WebhookSink};
pub use universe::{FileUniverse, StaticUniverse};
