//! Display formatting for metric values, and the inverse parse.
//!
//! Records store display strings; the comparator and the threshold checks
//! read numbers back out of them with [`parse_display`].

/// Unit suffix appended to a formatted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millis,
    RequestsPerSec,
    Count,
    Percent,
}

impl Unit {
    /// Suffix as written after the number.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Millis => "ms",
            Self::RequestsPerSec => " req/sec",
            Self::Count => "",
            Self::Percent => "%",
        }
    }

    /// Suffix without leading whitespace, for inline comparisons.
    pub fn label(self) -> &'static str {
        self.suffix().trim_start()
    }
}

pub fn format_millis(value: f64) -> String {
    format!("{value:.2}ms")
}

pub fn format_throughput(value: f64) -> String {
    format!("{value:.2} req/sec")
}

/// Counts print as written by k6: no fixed precision.
pub fn format_count(value: f64) -> String {
    format!("{value}")
}

/// Render a ratio in `0.0..=1.0` as a percentage.
pub fn format_ratio_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Parse a display string back into its number.
///
/// Returns `None` when the suffix does not match `unit` or the remainder is
/// not a number.
pub fn parse_display(display: &str, unit: Unit) -> Option<f64> {
    let number = display.trim().strip_suffix(unit.suffix())?;
    number.trim().parse().ok()
}

/// Signed percentage: `+` only for positive values, two decimals.
pub fn format_signed_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}
