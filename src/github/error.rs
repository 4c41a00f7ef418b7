//! GitHub API error types

use crate::github::pipeline::RequestDescriptor;
use thiserror::Error;

/// Structured failure of a single exchange with the API.
///
/// `status` is `None` when no HTTP response was obtained (DNS, connect,
/// timeout). Values are never mutated after construction.
#[derive(Debug, Clone, Error)]
#[error(
    "{} {} failed ({}): {message}",
    .descriptor.method.as_str(),
    .descriptor.uri_fragment,
    status_label(.status)
)]
pub struct ApiError {
    /// HTTP status code, if a response was received
    pub status: Option<u16>,
    /// Best available message: API `message` field, raw text, or transport error
    pub message: String,
    /// Response body as received, if any
    pub raw_body: Option<String>,
    /// The request that failed
    pub descriptor: RequestDescriptor,
    /// `documentation_url` from the API error body
    pub documentation_url: Option<String>,
    /// Flattened entries of the API `errors` array
    pub errors: Vec<String>,
    /// `X-GitHub-Request-Id` response header
    pub request_id: Option<String>,
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| s.to_string())
}

impl ApiError {
    /// Error for a request that never produced an HTTP response.
    #[must_use]
    pub fn transport(descriptor: &RequestDescriptor, message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            raw_body: None,
            descriptor: descriptor.clone(),
            documentation_url: None,
            errors: Vec::new(),
            request_id: None,
        }
    }

    /// Error for a non-success HTTP response.
    ///
    /// The body is decoded as a GitHub error document when possible; otherwise
    /// the raw text becomes the message.
    #[must_use]
    pub fn from_response(
        descriptor: &RequestDescriptor,
        status: u16,
        body: &[u8],
        request_id: Option<String>,
    ) -> Self {
        let raw = String::from_utf8_lossy(body).into_owned();
        let raw_body = (!raw.trim().is_empty()).then(|| raw.clone());

        let mut message = None;
        let mut documentation_url = None;
        let mut errors = Vec::new();

        let parsed = serde_json::from_slice::<serde_json::Value>(body);
        if let Ok(serde_json::Value::Object(doc)) = parsed {
            message = doc
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            documentation_url = doc
                .get("documentation_url")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string);
            if let Some(serde_json::Value::Array(entries)) = doc.get("errors") {
                errors = entries.iter().map(describe_validation_error).collect();
            }
        }

        let message = message
            .or_else(|| raw_body.clone())
            .unwrap_or_else(|| canonical_reason(status).to_string());

        Self {
            status: Some(status),
            message,
            raw_body,
            descriptor: descriptor.clone(),
            documentation_url,
            errors,
            request_id,
        }
    }

    /// Whether the failure carried the given HTTP status.
    #[must_use]
    pub fn is_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }

    /// Message plus validation details, one line.
    #[must_use]
    pub fn detailed_message(&self) -> String {
        let mut out = self.message.clone();
        if !self.errors.is_empty() {
            out.push_str(" | ");
            out.push_str(&self.errors.join(" | "));
        }
        if let Some(id) = &self.request_id {
            out.push_str(&format!(" | RequestId: {id}"));
        }
        out
    }
}

fn describe_validation_error(entry: &serde_json::Value) -> String {
    match entry {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(fields) => {
            if let Some(msg) = fields.get("message").and_then(serde_json::Value::as_str) {
                return msg.to_string();
            }
            let part = |key: &str| {
                fields
                    .get(key)
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("?")
                    .to_string()
            };
            format!("{} {} {}", part("resource"), part("field"), part("code"))
        }
        other => other.to_string(),
    }
}

fn canonical_reason(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown status")
}

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The API (or the network) rejected the request
    #[error("GitHub API error: {0}")]
    Api(#[from] ApiError),

    /// The result was still being computed after every permitted retry
    #[error(
        "{} {} still not ready (HTTP 202) after {attempts} attempts; retries exhausted",
        .descriptor.method.as_str(),
        .descriptor.uri_fragment
    )]
    RetryExhausted {
        /// Total requests issued, the first one included
        attempts: u32,
        /// The request that never became ready
        descriptor: Box<RequestDescriptor>,
    },

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read, written or applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored credential could not be written or cleared
    #[error("Credential error: {0}")]
    Credential(String),

    /// Response payload did not match the expected shape
    #[error("Unexpected response payload: {0}")]
    Decode(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

impl GitHubError {
    /// HTTP status of the underlying API failure, if there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api(api) => api.status,
            _ => None,
        }
    }

    /// Short type name used for exception telemetry.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GitHubError::Api(_) => "ApiError",
            GitHubError::RetryExhausted { .. } => "RetryExhausted",
            GitHubError::InvalidInput(_) => "InvalidInput",
            GitHubError::Config(_) => "Config",
            GitHubError::Credential(_) => "Credential",
            GitHubError::Decode(_) => "Decode",
            GitHubError::Io(_) => "Io",
            GitHubError::Json(_) => "Json",
        }
    }
}
