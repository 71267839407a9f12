//! Output contracts: where decisions and notification messages go.

use crate::signals::Decision;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("sink rejected message with HTTP {status}")]
    Rejected { status: u16 },
}

/// Receives a human-readable scan summary.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str) -> Result<(), SinkError>;
}

/// Persists one row per decision.
pub trait ExportSink: Send + Sync {
    fn export(&self, decisions: &[Decision]) -> Result<(), SinkError>;
}
