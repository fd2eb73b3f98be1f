use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{require_non_empty, Validate};
use crate::error::{ApiError, ApiResult};

pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status filter; `all` (or empty) means no filter.
    pub fn parse_filter(s: &str) -> ApiResult<Option<Self>> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ApiError::validation(format!(
                "unknown status '{s}' (expected scheduled, completed or cancelled)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: String,
    pub content: String,
    #[serde(deserialize_with = "utc_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validate for NewAppointment {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("patient_id", &self.patient_id)?;
        require_non_empty("patient_name", &self.patient_name)?;
        require_non_empty("doctor_id", &self.doctor_id)?;
        require_non_empty("doctor_name", &self.doctor_name)?;
        require_non_empty("date", &self.date)?;
        require_non_empty("time", &self.time)
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentUpdate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn cancel() -> Self {
        Self::status(AppointmentStatus::Cancelled)
    }

    fn text_fields(&self) -> [(&'static str, Option<&String>); 6] {
        [
            ("patient_id", self.patient_id.as_ref()),
            ("patient_name", self.patient_name.as_ref()),
            ("doctor_id", self.doctor_id.as_ref()),
            ("doctor_name", self.doctor_name.as_ref()),
            ("date", self.date.as_ref()),
            ("time", self.time.as_ref()),
        ]
    }
}

impl Validate for AppointmentUpdate {
    fn validate(&self) -> ApiResult<()> {
        let fields = self.text_fields();
        if fields.iter().all(|(_, v)| v.is_none()) && self.reason.is_none() && self.status.is_none()
        {
            return Err(ApiError::validation("update has no fields set"));
        }
        for (name, value) in fields {
            if let Some(value) = value {
                require_non_empty(name, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
}

impl Validate for NewComment {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("comment", &self.content)?;
        if self.content.chars().count() > MAX_COMMENT_LEN {
            return Err(ApiError::validation(format!(
                "comment is longer than {MAX_COMMENT_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Query filters for listing appointments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub patient: Option<String>,
    pub doctor: Option<String>,
}

impl AppointmentFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(patient) = self.patient.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("patient", patient.to_string()));
        }
        if let Some(doctor) = self.doctor.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("doctor", doctor.to_string()));
        }
        pairs
    }
}

/// Accepts RFC 3339 and the naive UTC timestamps the backend emits.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
