//! Request descriptors: what a resource operation asks the pipeline to do.

use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::github::error::{GitHubError, GitHubResult};

/// Default media type for every JSON call.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.v3+json";

/// Content type sent with every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP verbs the pipeline can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Methods that may carry a body and change server state.
    #[inline]
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// Immutable description of one logical API call.
///
/// `uri_fragment` is relative to the API root: it never carries a scheme,
/// host, or the enterprise `/api/v3` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub uri_fragment: String,
    pub body: Option<Bytes>,
    pub headers: BTreeMap<String, String>,
    pub accept: Option<String>,
    pub accept_pagination: bool,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub description: Option<String>,
    pub telemetry_event_name: Option<String>,
    pub telemetry_properties: BTreeMap<String, String>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: HttpMethod, uri_fragment: impl Into<String>) -> Self {
        let fragment: String = uri_fragment.into();
        Self {
            method,
            uri_fragment: fragment.trim_start_matches('/').to_string(),
            body: None,
            headers: BTreeMap::new(),
            accept: None,
            accept_pagination: false,
            max_retries: None,
            retry_delay: None,
            description: None,
            telemetry_event_name: None,
            telemetry_properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(uri_fragment: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, uri_fragment)
    }

    #[must_use]
    pub fn post(uri_fragment: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, uri_fragment)
    }

    #[must_use]
    pub fn patch(uri_fragment: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, uri_fragment)
    }

    #[must_use]
    pub fn put(uri_fragment: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, uri_fragment)
    }

    #[must_use]
    pub fn delete(uri_fragment: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, uri_fragment)
    }

    /// Attach a JSON body serialized from `value`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for GET requests; `Json` if serialization fails.
    pub fn json_body<T: Serialize + ?Sized>(self, value: &T) -> GitHubResult<Self> {
        let bytes = serde_json::to_vec(value)?;
        self.raw_body(bytes)
    }

    /// Attach a pre-serialized body.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for GET requests.
    pub fn raw_body(mut self, body: impl Into<Bytes>) -> GitHubResult<Self> {
        if !self.method.is_mutating() {
            return Err(GitHubError::InvalidInput(format!(
                "a request body cannot be sent with {}",
                self.method.as_str()
            )));
        }
        self.body = Some(body.into());
        Ok(self)
    }

    /// Override the `Accept` media type.
    #[must_use]
    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Aggregate every page reachable through `Link: rel="next"`.
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.accept_pagination = true;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn telemetry_event(mut self, name: impl Into<String>) -> Self {
        self.telemetry_event_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn telemetry_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.telemetry_properties.insert(key.into(), value.into());
        self
    }

    /// Media type actually sent.
    #[must_use]
    pub fn accept_header(&self) -> &str {
        self.accept.as_deref().unwrap_or(DEFAULT_ACCEPT)
    }

    /// Whether the response body should be decoded as JSON.
    #[must_use]
    pub fn expects_json(&self) -> bool {
        self.accept_header().contains("json")
    }

    /// Descriptor for the pages after the first: a bare GET.
    #[must_use]
    pub(crate) fn next_page(&self) -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
            ..self.clone()
        }
    }

    /// Reject fragments that smuggle in a scheme or host.
    pub(crate) fn validate(&self) -> GitHubResult<()> {
        if self.uri_fragment.contains("://") {
            return Err(GitHubError::InvalidInput(format!(
                "uri fragment must be relative to the API root, got '{}'",
                self.uri_fragment
            )));
        }
        if self.body.is_some() && !self.method.is_mutating() {
            return Err(GitHubError::InvalidInput(format!(
                "a request body cannot be sent with {}",
                self.method.as_str()
            )));
        }
        Ok(())
    }

    /// Human label for log lines.
    #[must_use]
    pub fn label(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!("{} {}", self.method.as_str(), self.uri_fragment)
        })
    }
}
