//! Error types for metrics extraction and threshold evaluation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not find metrics summary in {0}")]
    NoSummary(String),

    #[error("metrics summary is incomplete: {0}")]
    Schema(String),

    #[error("invalid threshold `{expr}`: {reason}")]
    Threshold { expr: String, reason: String },

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl MetricsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn threshold(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Threshold {
            expr: expr.into(),
            reason: reason.into(),
        }
    }
}
