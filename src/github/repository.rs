//! Identifying the repository an operation targets.

use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Settings;
use crate::github::error::{GitHubError, GitHubResult};
use crate::github::pipeline::host::is_enterprise_host;
use crate::github::util::path_segment;
use crate::telemetry::pii_safe;

/// Owner and name of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// # Errors
    ///
    /// `InvalidInput` when either part is blank or contains a `/`.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> GitHubResult<Self> {
        let owner = owner.into().trim().to_string();
        let name = name.into().trim().to_string();
        for (label, part) in [("owner", &owner), ("repository name", &name)] {
            if part.is_empty() {
                return Err(GitHubError::InvalidInput(format!("{label} must not be empty")));
            }
            if part.contains('/') {
                return Err(GitHubError::InvalidInput(format!(
                    "{label} '{part}' must not contain '/'"
                )));
            }
        }
        Ok(Self { owner, name })
    }

    /// Parse a repository URL.
    ///
    /// Accepts the web form (`https://<host>/owner/repo`), the public API form
    /// (`https://api.github.com/repos/owner/repo`) and the enterprise API form
    /// (`https://<host>/api/v3/repos/owner/repo`). A missing scheme is taken
    /// to be `https`, and a trailing `.git` is dropped.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the URL does not name an owner and repository.
    pub fn parse_uri(uri: &str) -> GitHubResult<Self> {
        let trimmed = uri.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let url = Url::parse(&with_scheme)
            .map_err(|e| GitHubError::InvalidInput(format!("'{uri}' is not a valid URL: {e}")))?;

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if segments.len() >= 2 && segments[0] == "api" && segments[1] == "v3" {
            segments.drain(..2);
        }
        if segments.first() == Some(&"repos") {
            segments.remove(0);
        }

        match segments.as_slice() {
            [owner, name, ..] => {
                let name = name.strip_suffix(".git").unwrap_or(*name);
                Self::new(*owner, name)
            }
            _ => Err(GitHubError::InvalidInput(format!(
                "'{uri}' does not identify a repository"
            ))),
        }
    }

    /// Pick the repository from a URL, explicit parts, or configured defaults.
    ///
    /// A URL may not be combined with explicit parts. Parts not given
    /// explicitly fall back to `DefaultOwnerName` / `DefaultRepositoryName`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the inputs conflict or nothing names a repository.
    pub fn resolve(
        uri: Option<&str>,
        owner: Option<&str>,
        name: Option<&str>,
        settings: &Settings,
    ) -> GitHubResult<Self> {
        if let Some(uri) = uri {
            if owner.is_some() || name.is_some() {
                return Err(GitHubError::InvalidInput(
                    "specify either a repository URL or an owner and name, not both".into(),
                ));
            }
            return Self::parse_uri(uri);
        }

        let owner = owner
            .filter(|o| !o.trim().is_empty())
            .unwrap_or(settings.default_owner_name.as_str());
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(settings.default_repository_name.as_str());
        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(GitHubError::InvalidInput(
                "no repository specified and no default owner and repository name configured"
                    .into(),
            ));
        }
        Self::new(owner, name)
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `repos/{owner}/{name}`, percent-encoded.
    #[must_use]
    pub fn fragment(&self) -> String {
        format!("repos/{}/{}", path_segment(&self.owner), path_segment(&self.name))
    }

    /// Web URL of the repository on `host`.
    #[must_use]
    pub fn html_url(&self, host: &str) -> String {
        let host = if is_enterprise_host(host) { host.trim() } else { "github.com" };
        format!("https://{host}/{}/{}", self.owner, self.name)
    }

    /// Owner and name for usage events, hashed unless PII protection is off.
    #[must_use]
    pub fn telemetry_properties(&self, settings: &Settings) -> BTreeMap<String, String> {
        let disable = settings.disable_pii_protection;
        BTreeMap::from([
            ("OwnerName".to_string(), pii_safe(&self.owner, disable)),
            ("RepositoryName".to_string(), pii_safe(&self.name, disable)),
        ])
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
