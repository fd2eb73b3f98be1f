use std::path::PathBuf;

use crate::error::MetricsResult;
use crate::report::SideLabels;
use crate::thresholds::ThresholdSet;

pub const DEFAULT_BASELINE_FILE: &str = "local_results.json";
pub const DEFAULT_CANDIDATE_FILE: &str = "cloud_results.json";

/// Inputs for one run of the metrics tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub baseline_file: PathBuf,
    pub candidate_file: PathBuf,
    pub labels: SideLabels,
    /// TOML thresholds file; `None` uses the script defaults.
    pub thresholds_path: Option<PathBuf>,
    pub check_thresholds: bool,
}

impl Default for ToolConfig {
    /// Default file names resolve against `LOADTEST_RESULTS_DIR`, else the
    /// working directory.
    fn default() -> Self {
        let results_dir = std::env::var("LOADTEST_RESULTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self {
            baseline_file: results_dir.join(DEFAULT_BASELINE_FILE),
            candidate_file: results_dir.join(DEFAULT_CANDIDATE_FILE),
            labels: SideLabels::default(),
            thresholds_path: std::env::var("LOADTEST_THRESHOLDS").ok().map(PathBuf::from),
            check_thresholds: true,
        }
    }
}

impl ToolConfig {
    /// Override the default file paths with whatever was given on the command line.
    pub fn with_paths(mut self, baseline: Option<PathBuf>, candidate: Option<PathBuf>) -> Self {
        if let Some(path) = baseline {
            self.baseline_file = path;
        }
        if let Some(path) = candidate {
            self.candidate_file = path;
        }
        self
    }

    /// Thresholds to check, loaded from `thresholds_path` when set.
    pub fn thresholds(&self) -> MetricsResult<ThresholdSet> {
        if !self.check_thresholds {
            return Ok(ThresholdSet::new(Vec::new()));
        }
        match &self.thresholds_path {
            Some(path) => ThresholdSet::load(path),
            None => Ok(ThresholdSet::default()),
        }
    }
}
