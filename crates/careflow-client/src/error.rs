use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from CareFlow API operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not authenticated: log in first")]
    Unauthenticated,

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Build a `Status` error from a non-2xx response body.
    ///
    /// FastAPI puts the message under `detail`, either as a string or as a
    /// list of `{loc, msg}` validation entries.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| detail_message(&v["detail"]))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "no detail".to_string()
                } else {
                    trimmed.to_string()
                }
            });
        Self::Status { status, detail }
    }

    /// True for 401/403 responses and missing tokens.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Status { status: 401 | 403, .. }
        )
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Array(entries) => {
            let msgs: Vec<String> = entries
                .iter()
                .filter_map(|e| {
                    let msg = e["msg"].as_str()?;
                    let field = e["loc"]
                        .as_array()
                        .and_then(|loc| loc.last())
                        .and_then(Value::as_str);
                    Some(match field {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
