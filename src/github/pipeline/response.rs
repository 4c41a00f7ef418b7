//! Decoded outcome of a successful exchange.

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::github::error::{GitHubError, GitHubResult};
use crate::github::pipeline::links::PageLinks;
use crate::github::transport::{HttpHeaders, header_get};

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No content (e.g. 204)
    Empty,
    /// Parsed JSON document
    Json(Value),
    /// Non-JSON media type, or JSON that failed to parse
    Raw(Bytes),
}

impl ResponseBody {
    /// Body as text; JSON is re-serialized, raw bytes are decoded lossily.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json(v) => v.to_string(),
            Self::Raw(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

/// Outcome of a single successful (2xx) HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: ResponseBody,
}

impl ExecutionResult {
    /// Decode a 2xx body according to what the request asked for.
    ///
    /// Bodies that claim to be JSON but do not parse are kept as raw content.
    pub(crate) fn decode(
        status: u16,
        headers: HttpHeaders,
        bytes: Bytes,
        expects_json: bool,
    ) -> Self {
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            ResponseBody::Empty
        } else if expects_json {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    log::debug!("Response body is not valid JSON ({e}); keeping raw content");
                    ResponseBody::Raw(bytes)
                }
            }
        } else {
            ResponseBody::Raw(bytes)
        };
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Pagination links from the `Link` header.
    #[must_use]
    pub fn links(&self) -> PageLinks {
        self.header("Link").map(PageLinks::parse).unwrap_or_default()
    }

    /// `Retry-After` in seconds, when the server sent one.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.header("Retry-After").and_then(|v| v.trim().parse().ok())
    }

    #[must_use]
    pub fn rate_limit_remaining(&self) -> Option<u64> {
        self.header("X-RateLimit-Remaining")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Moment the current rate-limit window resets.
    #[must_use]
    pub fn rate_limit_reset(&self) -> Option<DateTime<Utc>> {
        self.header("X-RateLimit-Reset")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("X-GitHub-Request-Id")
    }

    /// Take the JSON body, if there is one.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self.body {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Deserialize the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// `Decode` when the body is not JSON, `Json` when it does not match `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> GitHubResult<T> {
        match self.body {
            ResponseBody::Json(v) => Ok(serde_json::from_value(v)?),
            ResponseBody::Empty => Err(GitHubError::Decode("empty response body".into())),
            ResponseBody::Raw(b) => Err(GitHubError::Decode(format!(
                "expected JSON, got {} raw bytes",
                b.len()
            ))),
        }
    }
}

/// One exchange as seen by the retry loop.
///
/// 202 is not an error: it is the server asking to be polled again.
#[derive(Debug)]
pub(crate) enum Exchange {
    Ready(ExecutionResult),
    NotReady,
}
