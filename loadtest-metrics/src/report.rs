//! Console and markdown rendering.
//!
//! Every function returns a `String`; the entry point decides where it goes.

use std::path::Path;

use crate::compare::Comparison;
use crate::format;
use crate::record::{Indicator, MetricsRecord};
use crate::thresholds::ThresholdReport;

const RULE_WIDTH: usize = 60;

/// Indicators in the copy-paste table.
pub const TABLE_INDICATORS: [Indicator; 6] = [
    Indicator::AvgLatency,
    Indicator::P95Latency,
    Indicator::MaxLatency,
    Indicator::Throughput,
    Indicator::TotalRequests,
    Indicator::SuccessRate,
];

/// Names for the two runs being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLabels {
    pub baseline: String,
    pub candidate: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            baseline: "Local".to_string(),
            candidate: "Cloud".to_string(),
        }
    }
}

fn rule() -> String {
    "\u{2550}".repeat(RULE_WIDTH)
}

pub fn render_banner(labels: &SideLabels, baseline: &Path, candidate: &Path) -> String {
    let mut out = String::new();
    out.push_str("\n🚀 CareFlow Performance Metrics Extractor\n");
    out.push_str(&rule());
    out.push('\n');
    out.push_str(&format!(
        "  {:<12} {}\n",
        format!("{} file:", labels.baseline),
        baseline.display()
    ));
    out.push_str(&format!(
        "  {:<12} {}\n",
        format!("{} file:", labels.candidate),
        candidate.display()
    ));
    out
}

/// One run's indicators, or a "no data" notice.
pub fn render_record(title: &str, record: Option<&MetricsRecord>) -> String {
    let Some(record) = record else {
        return format!("\n❌ {title}: No data available\n");
    };

    let mut out = format!("\n📊 {title}\n{}\n", rule());
    for (indicator, value) in record.iter() {
        out.push_str(&format!("  {:<20}: {}\n", indicator.label(), value));
    }
    out.push_str(&rule());
    out.push('\n');
    out
}

pub fn render_comparison(labels: &SideLabels, comparison: Option<&Comparison>) -> String {
    let Some(comparison) = comparison else {
        return "\n⚠️  Cannot compare - missing data\n".to_string();
    };

    let mut out = format!(
        "\n🔄 Comparison ({} vs {})\n{}\n",
        labels.baseline,
        labels.candidate,
        rule()
    );
    for row in &comparison.rows {
        let unit = row.unit.label();
        let delta = row
            .delta_pct
            .map(format::format_signed_percent)
            .unwrap_or_else(|| "n/a".to_string());
        let verdict = if row.improved { "✅ Better" } else { "⚠️  Ok" };
        out.push_str(&format!(
            "  {:<20}: {:.2}{unit} → {:.2}{unit} ({delta}) {verdict}\n",
            row.indicator.label(),
            row.baseline,
            row.candidate,
        ));
    }
    out.push_str(&rule());
    out.push('\n');
    out
}

/// Copy-paste markdown table. `None` when neither side has data.
pub fn markdown_table(
    labels: &SideLabels,
    baseline: Option<&MetricsRecord>,
    candidate: Option<&MetricsRecord>,
) -> Option<String> {
    if baseline.is_none() && candidate.is_none() {
        return None;
    }

    let cell = |record: Option<&MetricsRecord>, indicator: Indicator| -> String {
        record
            .and_then(|r| r.get(indicator))
            .unwrap_or("N/A")
            .to_string()
    };

    let mut table = format!(
        "| Metric | {} | {} |\n|--------|-------|-------|\n",
        labels.baseline, labels.candidate
    );
    for indicator in TABLE_INDICATORS {
        table.push_str(&format!(
            "| **{}** | {} | {} |\n",
            indicator.label(),
            cell(baseline, indicator),
            cell(candidate, indicator),
        ));
    }
    Some(table)
}

pub fn render_markdown_section(
    labels: &SideLabels,
    baseline: Option<&MetricsRecord>,
    candidate: Option<&MetricsRecord>,
) -> String {
    match markdown_table(labels, baseline, candidate) {
        Some(table) => format!(
            "\n📋 Markdown Table (copy-paste ready)\n{rule}\n\n{table}\n{rule}\n",
            rule = rule()
        ),
        None => "\n⚠️  No data to generate table\n".to_string(),
    }
}

pub fn render_thresholds(title: &str, report: &ThresholdReport) -> String {
    let marker = if report.all_passing() { "✅" } else { "❌" };
    format!("\n{marker} {title}\n{}\n", report.summary())
}

/// How to produce the missing results files.
pub fn render_tips(labels: &SideLabels, baseline: &Path, candidate: &Path) -> String {
    let mut out = format!(
        "\n💡 Tip: Run both {} and {} tests to enable comparison\n",
        labels.baseline.to_lowercase(),
        labels.candidate.to_lowercase()
    );
    for (label, path) in [(&labels.baseline, baseline), (&labels.candidate, candidate)] {
        out.push_str(&format!(
            "   {:<7} k6 run --summary-export={} aws/stress_test/3_load_stress_test.js\n",
            format!("{label}:"),
            path.display()
        ));
    }
    out
}
