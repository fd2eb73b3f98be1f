//! Baseline vs candidate comparison.

use serde::{Deserialize, Serialize};

use crate::format::Unit;
use crate::record::{Indicator, MetricsRecord};

/// Whether a decrease or an increase counts as an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Latency: lower values are better.
    LowerIsBetter,
    /// Throughput: higher values are better.
    HigherIsBetter,
}

/// Indicators compared between runs, in report order.
pub const COMPARED: [(Indicator, Direction); 4] = [
    (Indicator::AvgLatency, Direction::LowerIsBetter),
    (Indicator::P95Latency, Direction::LowerIsBetter),
    (Indicator::MaxLatency, Direction::LowerIsBetter),
    (Indicator::Throughput, Direction::HigherIsBetter),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub indicator: Indicator,
    pub baseline: f64,
    pub candidate: f64,
    pub unit: Unit,
    pub direction: Direction,
    /// `(candidate - baseline) / baseline * 100`; `None` for a zero baseline.
    pub delta_pct: Option<f64>,
    pub improved: bool,
}

impl ComparisonRow {
    pub fn new(indicator: Indicator, direction: Direction, baseline: f64, candidate: f64) -> Self {
        let delta_pct = (baseline != 0.0).then(|| (candidate - baseline) / baseline * 100.0);
        let improved = match direction {
            Direction::LowerIsBetter => candidate < baseline,
            Direction::HigherIsBetter => candidate > baseline,
        };
        Self {
            indicator,
            baseline,
            candidate,
            unit: indicator.unit(),
            direction,
            delta_pct,
            improved,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn row(&self, indicator: Indicator) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.indicator == indicator)
    }

    pub fn improved_count(&self) -> usize {
        self.rows.iter().filter(|r| r.improved).count()
    }
}

/// Compare two records over [`COMPARED`].
///
/// Returns `None` when either side is missing; there is no partial
/// comparison. An indicator whose display string cannot be read back is
/// left out.
pub fn compare(
    baseline: Option<&MetricsRecord>,
    candidate: Option<&MetricsRecord>,
) -> Option<Comparison> {
    let (baseline, candidate) = (baseline?, candidate?);
    let rows = COMPARED
        .iter()
        .filter_map(|&(indicator, direction)| {
            let b = baseline.value(indicator)?;
            let c = candidate.value(indicator)?;
            Some(ComparisonRow::new(indicator, direction, b, c))
        })
        .collect();
    Some(Comparison { rows })
}
