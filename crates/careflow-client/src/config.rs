use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the CareFlow API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL without the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
    /// Where the bearer token is kept between CLI invocations.
    pub token_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timeout_secs = std::env::var("CAREFLOW_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            base_url: std::env::var("CAREFLOW_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into()),
            timeout: Duration::from_secs(timeout_secs),
            token_file: std::env::var("CAREFLOW_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_file()),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_token_file() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".careflow").join("token"),
        Err(_) => PathBuf::from(".careflow_token"),
    }
}
