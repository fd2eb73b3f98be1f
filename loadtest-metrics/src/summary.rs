//! Typed view of the k6 `metrics` object.
//!
//! Only the four metrics the report needs are modelled. Anything else k6
//! writes (checks, custom trends, per-metric thresholds) is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// The k6 metrics the extractor reads. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub http_req_duration: TrendStats,
    pub http_reqs: RequestStats,
    pub iterations: IterationStats,
    pub http_req_failed: FailureStats,
}

/// Latency aggregates in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub avg: f64,
    #[serde(rename = "p(95)")]
    pub p95: f64,
    #[serde(rename = "p(90)")]
    pub p90: f64,
    pub max: f64,
    pub min: f64,
    pub med: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    /// Requests per second over the whole run.
    pub rate: f64,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    pub count: f64,
}

/// Failed-request ratio.
///
/// `--summary-export` and the streamed summary disagree on the field name,
/// so both are accepted. `rate` wins when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl FailureStats {
    /// Fraction of failed requests in `0.0..=1.0`.
    pub fn ratio(&self) -> Option<f64> {
        self.rate.or(self.value)
    }
}

impl SummaryMetrics {
    /// Decode a located `metrics` object, rejecting partial data.
    pub fn from_value(metrics: &serde_json::Value) -> MetricsResult<Self> {
        let summary =
            Self::deserialize(metrics).map_err(|e| MetricsError::Schema(e.to_string()))?;
        if summary.http_req_failed.ratio().is_none() {
            return Err(MetricsError::Schema(
                "http_req_failed has neither `rate` nor `value`".to_string(),
            ));
        }
        Ok(summary)
    }

    pub fn failure_ratio(&self) -> f64 {
        self.http_req_failed.ratio().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics_json(failed: serde_json::Value) -> serde_json::Value {
        json!({
            "http_req_duration": {
                "avg": 120.5, "p(95)": 310.0, "p(90)": 250.0,
                "max": 900.0, "min": 12.0, "med": 98.0
            },
            "http_reqs": { "rate": 42.0, "count": 5040 },
            "iterations": { "count": 5000 },
            "http_req_failed": failed,
            "checks": { "passes": 5040, "fails": 0 }
        })
    }

    #[test]
    fn test_decodes_summary_export_shape() {
        let summary = SummaryMetrics::from_value(&metrics_json(json!({ "rate": 0.01 }))).unwrap();
        assert_eq!(summary.http_req_duration.p95, 310.0);
        assert_eq!(summary.http_reqs.count, 5040.0);
        assert_eq!(summary.failure_ratio(), 0.01);
    }

    #[test]
    fn test_accepts_value_field() {
        let summary =
            SummaryMetrics::from_value(&metrics_json(json!({ "value": 0.25, "passes": 3 })))
                .unwrap();
        assert_eq!(summary.failure_ratio(), 0.25);
    }

    #[test]
    fn test_rate_preferred_over_value() {
        let summary =
            SummaryMetrics::from_value(&metrics_json(json!({ "rate": 0.1, "value": 0.9 })))
                .unwrap();
        assert_eq!(summary.failure_ratio(), 0.1);
    }

    #[test]
    fn test_missing_failure_ratio_rejected() {
        let err = SummaryMetrics::from_value(&metrics_json(json!({ "passes": 1 }))).unwrap_err();
        assert!(matches!(err, MetricsError::Schema(_)));
    }

    #[test]
    fn test_missing_percentile_rejected() {
        let mut value = metrics_json(json!({ "rate": 0.0 }));
        value["http_req_duration"]
            .as_object_mut()
            .unwrap()
            .remove("p(90)");
        let err = SummaryMetrics::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("p(90)"));
    }
}
