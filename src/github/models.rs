//! Typed views of the API objects this crate returns.
//!
//! Only the fields callers commonly need are named; everything else the
//! server sends is kept in `extra` so no data is lost.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::github::error::{GitHubError, GitHubResult};

/// A user account as it appears in assignee lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub site_admin: bool,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An issue as returned by the assignee mutation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A license; the summary form from the list endpoint leaves `body` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub limitations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The license file detected in a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryLicense {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepositoryLicense {
    /// License file text, decoded from the base64 `content` field.
    ///
    /// # Errors
    ///
    /// `Decode` when the content is missing, uses an unknown encoding, or is
    /// not valid base64/UTF-8.
    pub fn decoded_content(&self) -> GitHubResult<String> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| GitHubError::Decode(format!("{}: no content", self.path)))?;
        if let Some(encoding) = self.encoding.as_deref()
            && encoding != "base64"
        {
            return Err(GitHubError::Decode(format!(
                "{}: unsupported content encoding '{encoding}'",
                self.path
            )));
        }
        // The API wraps base64 at 60 columns.
        let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| GitHubError::Decode(format!("{}: {e}", self.path)))?;
        String::from_utf8(bytes).map_err(|e| GitHubError::Decode(format!("{}: {e}", self.path)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeOfConduct {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitignoreTemplate {
    pub name: String,
    pub source: String,
}

/// One bucket of the rate limit report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitEntry {
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds
    pub reset: i64,
    #[serde(default)]
    pub used: Option<u64>,
}

impl RateLimitEntry {
    /// When the bucket refills.
    #[must_use]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset, 0).single()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitEntry,
    #[serde(default)]
    pub search: Option<RateLimitEntry>,
    #[serde(default)]
    pub graphql: Option<RateLimitEntry>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub resources: RateLimitResources,
    /// Legacy mirror of `resources.core`
    #[serde(default)]
    pub rate: Option<RateLimitEntry>,
}
