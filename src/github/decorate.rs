//! Type tags and repository provenance attached to returned objects.
//!
//! The pipeline hands back plain JSON; resource operations wrap their typed
//! results in [`Decorated`] so downstream consumers can tell what a value is
//! and which repository it came from without inspecting its fields.

use serde::Serialize;
use std::fmt;
use std::ops::Deref;

use crate::config::Settings;
use crate::github::repository::RepositoryRef;

/// What a decorated value represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    User,
    Issue,
    License,
    RepositoryLicense,
    CodeOfConduct,
    GitignoreTemplate,
    RateLimit,
}

impl ResourceKind {
    /// Stable type name, e.g. `GitHub.User`.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            ResourceKind::User => "GitHub.User",
            ResourceKind::Issue => "GitHub.Issue",
            ResourceKind::License => "GitHub.License",
            ResourceKind::RepositoryLicense => "GitHub.RepositoryLicense",
            ResourceKind::CodeOfConduct => "GitHub.CodeOfConduct",
            ResourceKind::GitignoreTemplate => "GitHub.Gitignore",
            ResourceKind::RateLimit => "GitHub.RateLimit",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A typed value plus its type tag and, optionally, the repository it belongs to.
///
/// Serializes as the value's own fields with `_type` and `RepositoryUrl` added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decorated<T> {
    #[serde(rename = "_type", serialize_with = "serialize_kind")]
    kind: ResourceKind,
    #[serde(rename = "RepositoryUrl", skip_serializing_if = "Option::is_none")]
    repository_url: Option<String>,
    #[serde(flatten)]
    value: T,
}

fn serialize_kind<S: serde::Serializer>(kind: &ResourceKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.type_name())
}

impl<T> Decorated<T> {
    /// Tag `value` as `kind`, recording `repository` unless pipeline support is disabled.
    #[must_use]
    pub fn new(
        kind: ResourceKind,
        value: T,
        repository: Option<&RepositoryRef>,
        settings: &Settings,
    ) -> Self {
        let repository_url = if settings.disable_pipeline_support {
            None
        } else {
            repository.map(|r| r.html_url(&settings.api_host_name))
        };
        Self {
            kind,
            repository_url,
            value,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    #[must_use]
    pub fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Decorated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
