//! Request and response bodies for the CareFlow API.
//!
//! Outgoing bodies implement [`Validate`] and are checked before any
//! network call. Incoming bodies are plain serde structs; a body that does
//! not match is a decode error, never a partially-filled value.

pub mod ai;
pub mod appointment;
pub mod user;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub use ai::{
    ChatRequest, ChatResponse, ChatTurn, PopularTerms, ReportAnalysis, ReportKind, ReportUpload,
    TermDefinition, TermSearchRequest, MAX_UPLOAD_BYTES,
};
pub use appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, AppointmentUpdate, Comment, NewAppointment,
    NewComment, MAX_COMMENT_LEN,
};
pub use user::{LoginRequest, NewUser, Role, SignupRequest, TokenResponse, User, MIN_PASSWORD_LEN};

/// Client-side checks run before a request is sent.
pub trait Validate {
    fn validate(&self) -> ApiResult<()>;
}

/// `{"success": true, "message": "..."}` bodies from logout and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Loose shape check: one `@`, a non-empty local part, a dotted domain.
pub(crate) fn validate_email(email: &str) -> ApiResult<()> {
    let invalid = || ApiError::validation(format!("'{email}' is not a valid email address"));
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("nurse@careflow.ai").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        for bad in ["", "plain", "@careflow.ai", "a@b", "a@@b.c", "a b@c.d", "a@b."] {
            assert!(validate_email(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "Ada").is_ok());
        let err = require_non_empty("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: name must not be empty");
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status": "healthy", "service": "CareFlowAI API", "database": "MongoDB"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
    }
}
