//! Normalized metrics record for one analyzed results file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::{self, Unit};
use crate::summary::SummaryMetrics;

/// A reported indicator. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    AvgLatency,
    P95Latency,
    P90Latency,
    MaxLatency,
    MinLatency,
    MedianLatency,
    Throughput,
    TotalRequests,
    TotalIterations,
    ErrorRate,
    SuccessRate,
}

impl Indicator {
    pub const ALL: [Indicator; 11] = [
        Self::AvgLatency,
        Self::P95Latency,
        Self::P90Latency,
        Self::MaxLatency,
        Self::MinLatency,
        Self::MedianLatency,
        Self::Throughput,
        Self::TotalRequests,
        Self::TotalIterations,
        Self::ErrorRate,
        Self::SuccessRate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AvgLatency => "Avg latency",
            Self::P95Latency => "P95 latency",
            Self::P90Latency => "P90 latency",
            Self::MaxLatency => "Max latency",
            Self::MinLatency => "Min latency",
            Self::MedianLatency => "Median latency",
            Self::Throughput => "Throughput",
            Self::TotalRequests => "Total requests",
            Self::TotalIterations => "Total iterations",
            Self::ErrorRate => "Error rate",
            Self::SuccessRate => "Success rate",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Self::AvgLatency
            | Self::P95Latency
            | Self::P90Latency
            | Self::MaxLatency
            | Self::MinLatency
            | Self::MedianLatency => Unit::Millis,
            Self::Throughput => Unit::RequestsPerSec,
            Self::TotalRequests | Self::TotalIterations => Unit::Count,
            Self::ErrorRate | Self::SuccessRate => Unit::Percent,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display strings for every [`Indicator`], built from a complete summary.
///
/// There is no way to build a partially filled record: the only
/// constructor takes a decoded [`SummaryMetrics`], which is kept alongside
/// the display strings for checks that need unrounded numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    values: BTreeMap<Indicator, String>,
    #[serde(skip)]
    summary: SummaryMetrics,
}

impl MetricsRecord {
    pub fn from_summary(summary: &SummaryMetrics) -> Self {
        let duration = &summary.http_req_duration;
        let failed = summary.failure_ratio();

        let values = BTreeMap::from([
            (Indicator::AvgLatency, format::format_millis(duration.avg)),
            (Indicator::P95Latency, format::format_millis(duration.p95)),
            (Indicator::P90Latency, format::format_millis(duration.p90)),
            (Indicator::MaxLatency, format::format_millis(duration.max)),
            (Indicator::MinLatency, format::format_millis(duration.min)),
            (Indicator::MedianLatency, format::format_millis(duration.med)),
            (
                Indicator::Throughput,
                format::format_throughput(summary.http_reqs.rate),
            ),
            (
                Indicator::TotalRequests,
                format::format_count(summary.http_reqs.count),
            ),
            (
                Indicator::TotalIterations,
                format::format_count(summary.iterations.count),
            ),
            (Indicator::ErrorRate, format::format_ratio_percent(failed)),
            (
                Indicator::SuccessRate,
                format::format_ratio_percent(1.0 - failed),
            ),
        ]);

        Self {
            values,
            summary: summary.clone(),
        }
    }

    pub fn summary(&self) -> &SummaryMetrics {
        &self.summary
    }

    /// Unrounded value in k6 units. Error and success rates are fractions.
    pub fn raw_value(&self, indicator: Indicator) -> f64 {
        let duration = &self.summary.http_req_duration;
        match indicator {
            Indicator::AvgLatency => duration.avg,
            Indicator::P95Latency => duration.p95,
            Indicator::P90Latency => duration.p90,
            Indicator::MaxLatency => duration.max,
            Indicator::MinLatency => duration.min,
            Indicator::MedianLatency => duration.med,
            Indicator::Throughput => self.summary.http_reqs.rate,
            Indicator::TotalRequests => self.summary.http_reqs.count,
            Indicator::TotalIterations => self.summary.iterations.count,
            Indicator::ErrorRate => self.summary.failure_ratio(),
            Indicator::SuccessRate => 1.0 - self.summary.failure_ratio(),
        }
    }

    /// Display string for an indicator.
    pub fn get(&self, indicator: Indicator) -> Option<&str> {
        self.values.get(&indicator).map(String::as_str)
    }

    /// Numeric value read back from the display string.
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.get(indicator)
            .and_then(|display| format::parse_display(display, indicator.unit()))
    }

    /// Indicators and display strings in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::summary::{FailureStats, IterationStats, RequestStats, TrendStats};

    /// Summary with the given average latency and throughput.
    pub(crate) fn summary(avg: f64, rate: f64) -> SummaryMetrics {
        SummaryMetrics {
            http_req_duration: TrendStats {
                avg,
                p95: avg * 2.0,
                p90: avg * 1.5,
                max: avg * 4.0,
                min: avg / 4.0,
                med: avg * 0.9,
            },
            http_reqs: RequestStats {
                rate,
                count: 1200.0,
            },
            iterations: IterationStats { count: 1150.0 },
            http_req_failed: FailureStats {
                rate: Some(0.015),
                value: None,
            },
        }
    }

    #[test]
    fn test_record_formats_every_indicator() {
        let record = MetricsRecord::from_summary(&summary(123.456, 41.666));
        assert_eq!(record.get(Indicator::AvgLatency), Some("123.46ms"));
        assert_eq!(record.get(Indicator::P95Latency), Some("246.91ms"));
        assert_eq!(record.get(Indicator::Throughput), Some("41.67 req/sec"));
        assert_eq!(record.get(Indicator::TotalRequests), Some("1200"));
        assert_eq!(record.get(Indicator::TotalIterations), Some("1150"));
        assert_eq!(record.get(Indicator::ErrorRate), Some("1.50%"));
        assert_eq!(record.get(Indicator::SuccessRate), Some("98.50%"));
        assert_eq!(record.iter().count(), Indicator::ALL.len());
    }

    #[test]
    fn test_iteration_follows_label_order() {
        let record = MetricsRecord::from_summary(&summary(10.0, 1.0));
        let order: Vec<Indicator> = record.iter().map(|(i, _)| i).collect();
        assert_eq!(order, Indicator::ALL.to_vec());
    }

    #[test]
    fn test_value_reads_display_back() {
        let record = MetricsRecord::from_summary(&summary(80.0, 40.0));
        assert_eq!(record.value(Indicator::AvgLatency), Some(80.0));
        assert_eq!(record.value(Indicator::Throughput), Some(40.0));
        assert_eq!(record.value(Indicator::ErrorRate), Some(1.5));
    }

    #[test]
    fn test_raw_value_skips_rounding() {
        let mut s = summary(80.0, 40.0);
        s.http_req_duration.p95 = 799.996;
        let record = MetricsRecord::from_summary(&s);
        assert_eq!(record.get(Indicator::P95Latency), Some("800.00ms"));
        assert_eq!(record.raw_value(Indicator::P95Latency), 799.996);
        assert_eq!(record.raw_value(Indicator::ErrorRate), 0.015);
    }
}
