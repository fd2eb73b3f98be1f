//! k6-style pass/fail thresholds
//!
//! The load-test scripts declare their service-level expectations in k6
//! threshold syntax:
//!
//! ```text
//! thresholds: {
//!     http_req_failed:   ["rate<0.02"],   // < 2% failures
//!     http_req_duration: ["p(95)<800"],   // 95% of requests under 800 ms
//! }
//! ```
//!
//! The same expressions are parsed here and checked against the unrounded
//! summary behind an extracted [`MetricsRecord`], so a results file can be
//! gated after the fact with the verdict k6 itself would give.
//!
//! | Metric | Aggregates |
//! |---|---|
//! | `http_req_duration` | avg, min, max, med, p(90), p(95) |
//! | `http_reqs` | rate, count |
//! | `iterations` | count |
//! | `http_req_failed` | rate (fraction, not percent) |

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MetricsError, MetricsResult};
use crate::record::{Indicator, MetricsRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Avg,
    Min,
    Max,
    Med,
    P90,
    P95,
    Rate,
    Count,
}

impl Aggregate {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "avg" => Self::Avg,
            "min" => Self::Min,
            "max" => Self::Max,
            "med" => Self::Med,
            "p(90)" => Self::P90,
            "p(95)" => Self::P95,
            "rate" => Self::Rate,
            "count" => Self::Count,
            _ => return None,
        })
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Med => "med",
            Self::P90 => "p(90)",
            Self::P95 => "p(95)",
            Self::Rate => "rate",
            Self::Count => "count",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Operator {
    /// Longest tokens first so `<=` is not read as `<`.
    const TOKENS: [(&'static str, Operator); 7] = [
        ("===", Operator::Eq),
        ("<=", Operator::Le),
        (">=", Operator::Ge),
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        ("<", Operator::Lt),
        (">", Operator::Gt),
    ];

    pub fn holds(self, observed: f64, bound: f64) -> bool {
        match self {
            Self::Lt => observed < bound,
            Self::Le => observed <= bound,
            Self::Gt => observed > bound,
            Self::Ge => observed >= bound,
            Self::Eq => observed == bound,
            Self::Ne => observed != bound,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

/// One threshold expression attached to one k6 metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub metric: String,
    pub aggregate: Aggregate,
    pub op: Operator,
    pub bound: f64,
    indicator: Indicator,
}

impl Threshold {
    /// Parse `expr` (e.g. `p(95)<800`) for `metric` (e.g. `http_req_duration`).
    pub fn parse(metric: &str, expr: &str) -> MetricsResult<Self> {
        let (lhs, op, rhs) = split_expr(expr)
            .ok_or_else(|| MetricsError::threshold(expr, "expected `<aggregate><op><number>`"))?;
        let aggregate = Aggregate::parse(lhs)
            .ok_or_else(|| MetricsError::threshold(expr, format!("unknown aggregate `{lhs}`")))?;
        let bound: f64 = rhs
            .parse()
            .map_err(|_| MetricsError::threshold(expr, format!("`{rhs}` is not a number")))?;
        let indicator = resolve(metric, aggregate).ok_or_else(|| {
            MetricsError::threshold(expr, format!("`{aggregate}` is not supported for `{metric}`"))
        })?;

        Ok(Self {
            metric: metric.to_string(),
            aggregate,
            op,
            bound,
            indicator,
        })
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Observed value in k6 units, taken from the raw summary.
    pub fn observe(&self, record: &MetricsRecord) -> f64 {
        record.raw_value(self.indicator)
    }

    pub fn evaluate(&self, record: &MetricsRecord) -> ThresholdResult {
        let observed = self.observe(record);
        let passed = self.op.holds(observed, self.bound);
        ThresholdResult {
            threshold: self.clone(),
            observed,
            passed,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}{}",
            self.metric,
            self.aggregate,
            self.op.symbol(),
            self.bound
        )
    }
}

fn split_expr(expr: &str) -> Option<(&str, Operator, &str)> {
    let start = expr.find(['<', '>', '=', '!'])?;
    let rest = &expr[start..];
    let (token, op) = Operator::TOKENS
        .iter()
        .find(|(token, _)| rest.starts_with(token))?;
    let lhs = expr[..start].trim();
    let rhs = rest[token.len()..].trim();
    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }
    Some((lhs, *op, rhs))
}

fn resolve(metric: &str, aggregate: Aggregate) -> Option<Indicator> {
    use Aggregate::*;
    Some(match (metric, aggregate) {
        ("http_req_duration", Avg) => Indicator::AvgLatency,
        ("http_req_duration", Min) => Indicator::MinLatency,
        ("http_req_duration", Max) => Indicator::MaxLatency,
        ("http_req_duration", Med) => Indicator::MedianLatency,
        ("http_req_duration", P90) => Indicator::P90Latency,
        ("http_req_duration", P95) => Indicator::P95Latency,
        ("http_reqs", Rate) => Indicator::Throughput,
        ("http_reqs", Count) => Indicator::TotalRequests,
        ("iterations", Count) => Indicator::TotalIterations,
        ("http_req_failed", Rate) => Indicator::ErrorRate,
        _ => return None,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdResult {
    pub threshold: Threshold,
    pub observed: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdReport {
    pub results: Vec<ThresholdResult>,
    pub passing: usize,
    pub failing: usize,
}

impl ThresholdReport {
    pub fn all_passing(&self) -> bool {
        self.failing == 0
    }

    /// Format as a human-readable summary.
    pub fn summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.results.len() + 1);
        lines.push(format!(
            "Thresholds: {} passing, {} failing",
            self.passing, self.failing
        ));
        for r in &self.results {
            let status = if r.passed { "[PASS]" } else { "[FAIL]" };
            lines.push(format!(
                "  {status} {} (observed {:.4})",
                r.threshold, r.observed
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Deserialize)]
struct ThresholdFile {
    thresholds: BTreeMap<String, Vec<String>>,
}

/// Ordered list of thresholds to check.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSet {
    thresholds: Vec<Threshold>,
}

impl Default for ThresholdSet {
    /// The thresholds every load-test script declares.
    fn default() -> Self {
        let thresholds = [("http_req_failed", "rate<0.02"), ("http_req_duration", "p(95)<800")]
            .into_iter()
            .filter_map(|(metric, expr)| Threshold::parse(metric, expr).ok())
            .collect();
        Self { thresholds }
    }
}

impl ThresholdSet {
    pub fn new(thresholds: Vec<Threshold>) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Parse a `[thresholds]` TOML table mapping metric names to expression lists.
    pub fn from_toml_str(content: &str) -> MetricsResult<Self> {
        let file: ThresholdFile = toml::from_str(content).map_err(|e| MetricsError::Config {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        let mut thresholds = Vec::new();
        for (metric, exprs) in &file.thresholds {
            for expr in exprs {
                thresholds.push(Threshold::parse(metric, expr)?);
            }
        }
        Ok(Self { thresholds })
    }

    pub fn load(path: &Path) -> MetricsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetricsError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            MetricsError::Config { reason, .. } => MetricsError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn evaluate(&self, record: &MetricsRecord) -> ThresholdReport {
        let results: Vec<ThresholdResult> =
            self.thresholds.iter().map(|t| t.evaluate(record)).collect();
        let passing = results.iter().filter(|r| r.passed).count();
        ThresholdReport {
            failing: results.len() - passing,
            passing,
            results,
        }
    }
}
