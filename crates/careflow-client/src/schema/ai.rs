use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{require_non_empty, Validate};
use crate::error::{ApiError, ApiResult};

/// Upload cap enforced by the analyze-report endpoint.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    pub analysis: String,
    pub summary: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermSearchRequest {
    pub query: String,
}

impl Validate for TermSearchRequest {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("search query", &self.query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularTerms {
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Follow-up question to the AI nurse, optionally about an analyzed report.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ChatTurn>>,
}

impl Validate for ChatRequest {
    fn validate(&self) -> ApiResult<()> {
        require_non_empty("question", &self.question)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub message_id: String,
}

/// File types the analyze-report endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Pdf,
    Jpeg,
    Png,
}

impl ReportKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// A health report ready to upload as the multipart `file` field.
#[derive(Debug, Clone)]
pub struct ReportUpload {
    pub file_name: String,
    pub kind: ReportKind,
    pub bytes: Vec<u8>,
}

impl ReportUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> ApiResult<Self> {
        let file_name = file_name.into();
        let kind = ReportKind::from_file_name(&file_name).ok_or_else(|| {
            ApiError::validation(format!(
                "unsupported file type for '{file_name}'. Allowed: PDF, JPG, PNG"
            ))
        })?;
        let upload = Self {
            file_name,
            kind,
            bytes,
        };
        upload.validate()?;
        Ok(upload)
    }

    pub async fn read(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("report")
            .to_string();
        Self::new(file_name, bytes)
    }
}

impl Validate for ReportUpload {
    fn validate(&self) -> ApiResult<()> {
        if self.bytes.is_empty() {
            return Err(ApiError::validation(format!("'{}' is empty", self.file_name)));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::validation(format!(
                "'{}' is {} bytes; maximum is {} MB",
                self.file_name,
                self.bytes.len(),
                MAX_UPLOAD_BYTES / 1024 / 1024
            )));
        }
        Ok(())
    }
}
