//! Load-test metrics for the CareFlow API
//!
//! Reads k6 results for two runs of the same script (usually a local and a
//! cloud deployment), normalizes them, and reports how they differ.
//!
//! # Pipeline
//!
//! ```text
//! results file ─→ extract ─→ MetricsRecord ─┬─→ report (console summary)
//!                                           ├─→ compare ─→ report (deltas, markdown)
//!                                           └─→ thresholds ─→ report (pass/fail)
//! ```
//!
//! # Usage
//!
//! ```bash
//! # defaults to ./local_results.json and ./cloud_results.json
//! loadtest-metrics
//!
//! # explicit files and a custom threshold set
//! loadtest-metrics local.json cloud.json --thresholds thresholds.toml
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod summary;
pub mod thresholds;

pub use compare::{compare, Comparison, ComparisonRow, Direction};
pub use config::ToolConfig;
pub use error::{MetricsError, MetricsResult};
pub use extract::{Extractor, LocateStrategy, NdjsonLog, SummaryExport};
pub use pipeline::{run, RunOutcome, Side, SideStatus};
pub use record::{Indicator, MetricsRecord};
pub use report::SideLabels;
pub use summary::SummaryMetrics;
pub use thresholds::{Threshold, ThresholdReport, ThresholdSet};
