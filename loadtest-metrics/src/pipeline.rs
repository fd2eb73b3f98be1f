//! The batch run: read → parse → format → compare → render.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::compare::{compare, Comparison};
use crate::config::ToolConfig;
use crate::extract::Extractor;
use crate::record::MetricsRecord;
use crate::report;
use crate::thresholds::{ThresholdReport, ThresholdSet};

/// What a run produced for one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum SideStatus {
    Loaded,
    Missing,
    /// The file existed but extraction failed.
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct Side {
    pub status: SideStatus,
    pub record: Option<MetricsRecord>,
}

impl Side {
    fn load(extractor: &Extractor, path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "results file not found");
            return Self {
                status: SideStatus::Missing,
                record: None,
            };
        }
        match extractor.extract_file_or_log(path) {
            (Some(record), _) => Self {
                status: SideStatus::Loaded,
                record: Some(record),
            },
            (None, message) => Self {
                status: SideStatus::Unreadable(message.unwrap_or_default()),
                record: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub baseline: Side,
    pub candidate: Side,
    pub comparison: Option<Comparison>,
    pub baseline_thresholds: Option<ThresholdReport>,
    pub candidate_thresholds: Option<ThresholdReport>,
}

/// Run the whole pipeline, writing the report to `out`.
///
/// Data problems never fail the run; only write errors do.
pub fn run<W: Write>(
    config: &ToolConfig,
    thresholds: &ThresholdSet,
    out: &mut W,
) -> io::Result<RunOutcome> {
    let labels = &config.labels;
    let extractor = Extractor::default();

    write!(
        out,
        "{}",
        report::render_banner(labels, &config.baseline_file, &config.candidate_file)
    )?;

    let baseline = Side::load(&extractor, &config.baseline_file);
    let candidate = Side::load(&extractor, &config.candidate_file);
    for (label, side) in [(&labels.baseline, &baseline), (&labels.candidate, &candidate)] {
        if let SideStatus::Unreadable(message) = &side.status {
            writeln!(out, "\n❌ Error reading {label} results: {message}")?;
        }
    }

    let b = baseline.record.as_ref();
    let c = candidate.record.as_ref();

    write!(out, "{}", report::render_record(&environment_title(&labels.baseline), b))?;
    write!(out, "{}", report::render_record(&environment_title(&labels.candidate), c))?;

    let comparison = compare(b, c);
    if comparison.is_some() {
        write!(out, "{}", report::render_comparison(labels, comparison.as_ref()))?;
    }
    write!(out, "{}", report::render_markdown_section(labels, b, c))?;
    if comparison.is_none() {
        write!(out, "{}", report::render_comparison(labels, None))?;
        write!(
            out,
            "{}",
            report::render_tips(labels, &config.baseline_file, &config.candidate_file)
        )?;
    }

    let mut reports = [None, None];
    if !thresholds.is_empty() {
        for (slot, (label, record)) in reports
            .iter_mut()
            .zip([(&labels.baseline, b), (&labels.candidate, c)])
        {
            let Some(record) = record else { continue };
            let threshold_report = thresholds.evaluate(record);
            write!(
                out,
                "{}",
                report::render_thresholds(&format!("{label} thresholds"), &threshold_report)
            )?;
            *slot = Some(threshold_report);
        }
    }
    let [baseline_thresholds, candidate_thresholds] = reports;

    writeln!(out, "\n✨ Done!")?;

    Ok(RunOutcome {
        baseline,
        candidate,
        comparison,
        baseline_thresholds,
        candidate_thresholds,
    })
}

fn environment_title(label: &str) -> String {
    format!("{} ENVIRONMENT", label.to_uppercase())
}
