//! Strategies for locating the k6 `metrics` object in a results file.

use serde_json::Value;
use tracing::debug;

/// One way of finding the `metrics` object inside file content.
pub trait LocateStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The `metrics` object, or `None` when this shape does not apply.
    fn locate(&self, content: &str) -> Option<Value>;
}

/// `k6 run --summary-export=out.json`: the whole file is one object with a
/// top-level `metrics` field.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryExport;

impl LocateStrategy for SummaryExport {
    fn name(&self) -> &'static str {
        "summary-export"
    }

    fn locate(&self, content: &str) -> Option<Value> {
        let mut document: Value = serde_json::from_str(content).ok()?;
        document.get_mut("metrics").map(Value::take)
    }
}

/// `k6 run --out json=out.json`: one JSON record per line.
///
/// The first record typed `"summary"` or carrying a `metrics` field is the
/// candidate. Malformed lines are skipped. If the candidate has no `metrics`
/// the strategy gives up rather than searching further.
#[derive(Debug, Default, Clone, Copy)]
pub struct NdjsonLog;

impl LocateStrategy for NdjsonLog {
    fn name(&self) -> &'static str {
        "ndjson-log"
    }

    fn locate(&self, content: &str) -> Option<Value> {
        let mut candidate = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .filter_map(|(idx, line)| match serde_json::from_str::<Value>(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(line = idx + 1, error = %e, "skipping malformed line");
                    None
                }
            })
            .find(|record| {
                record.get("type").and_then(Value::as_str) == Some("summary")
                    || record.get("metrics").is_some()
            })?;
        candidate.get_mut("metrics").map(Value::take)
    }
}

/// The strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn LocateStrategy>> {
    vec![Box::new(SummaryExport), Box::new(NdjsonLog)]
}
