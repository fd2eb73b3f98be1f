//! Metric extraction
//!
//! Turns a k6 results file into a [`MetricsRecord`].
//!
//! ```text
//! file content ─→ SummaryExport ──found──┐
//!        │                               ├─→ SummaryMetrics ─→ MetricsRecord
//!        └──────→ NdjsonLog ─────found───┘
//! ```
//!
//! Strategies run in a fixed order and the first one that locates a
//! `metrics` object wins. Decoding that object is all-or-nothing.

pub mod strategy;

pub use strategy::{default_strategies, LocateStrategy, NdjsonLog, SummaryExport};

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{MetricsError, MetricsResult};
use crate::record::MetricsRecord;
use crate::summary::SummaryMetrics;

pub struct Extractor {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn LocateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract a record from file content. `source` names the input in errors.
    pub fn extract_str(&self, content: &str, source: &str) -> MetricsResult<MetricsRecord> {
        let metrics = self
            .strategies
            .iter()
            .find_map(|strategy| {
                let found = strategy.locate(content);
                debug!(
                    strategy = strategy.name(),
                    found = found.is_some(),
                    source,
                    "locate metrics"
                );
                found
            })
            .ok_or_else(|| MetricsError::NoSummary(source.to_string()))?;

        let summary = SummaryMetrics::from_value(&metrics)?;
        Ok(MetricsRecord::from_summary(&summary))
    }

    pub fn extract_file(&self, path: &Path) -> MetricsResult<MetricsRecord> {
        let content = fs::read_to_string(path).map_err(|e| MetricsError::io(path, e))?;
        self.extract_str(&content, &path.display().to_string())
    }

    /// Like [`Extractor::extract_file`] but never fails: errors are logged
    /// and come back as `None`, with the message for the console.
    pub fn extract_file_or_log(&self, path: &Path) -> (Option<MetricsRecord>, Option<String>) {
        match self.extract_file(path) {
            Ok(record) => (Some(record), None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "metrics extraction failed");
                (None, Some(e.to_string()))
            }
        }
    }
}
