//! GitHub API client
//!
//! Entry point for every resource operation. Owns a [`RequestPipeline`]
//! bound to one [`GitHubContext`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use ghcmd::{GitHubClient, RepositoryRef};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gh = GitHubClient::with_token("ghp_...")?;
//!
//!     let repo = RepositoryRef::new("octocat", "Hello-World")?;
//!     let assignable = gh.test_assignee(repo, "octocat").await??;
//!     println!("assignable: {assignable}");
//!
//!     Ok(())
//! }
//! ```

use secrecy::SecretString;
use std::sync::Arc;

use crate::context::GitHubContext;
use crate::github::error::{GitHubError, GitHubResult};
use crate::github::pipeline::{PageProgress, ProgressCallback, RequestPipeline};
use crate::github::repository::RepositoryRef;
use crate::github::transport::{HttpTransport, ReqwestTransport};
use crate::telemetry::TelemetryReporter;

mod assignees;
mod miscellaneous;

/// GitHub API client.
///
/// Cloning is cheap (Arc clones).
#[derive(Clone, Debug)]
pub struct GitHubClient {
    pipeline: RequestPipeline,
}

impl GitHubClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Convenience: create client with personal access token
    pub fn with_token(token: impl Into<String>) -> GitHubResult<Self> {
        Self::builder().personal_token(token).build()
    }

    /// The pipeline every operation goes through; use it for endpoints
    /// without a dedicated method.
    #[must_use]
    pub fn pipeline(&self) -> &RequestPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn context(&self) -> &Arc<GitHubContext> {
        self.pipeline.context()
    }

    /// Resolve a repository against this client's configured defaults.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the inputs conflict or nothing names a repository.
    pub fn repository(
        &self,
        uri: Option<&str>,
        owner: Option<&str>,
        name: Option<&str>,
    ) -> GitHubResult<RepositoryRef> {
        RepositoryRef::resolve(uri, owner, name, &self.pipeline.settings())
    }
}

/// Builder for [`GitHubClient`].
#[derive(Default)]
pub struct GitHubClientBuilder {
    token: Option<SecretString>,
    context: Option<Arc<GitHubContext>>,
    transport: Option<Arc<dyn HttpTransport>>,
    telemetry_endpoint: Option<String>,
    on_progress: Option<ProgressCallback>,
}

impl GitHubClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token used ahead of any stored credential
    #[must_use]
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Settings and credentials to use; defaults to the per-user files
    #[must_use]
    pub fn context(mut self, context: Arc<GitHubContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// HTTP implementation; defaults to reqwest
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Where usage events are posted
    #[must_use]
    pub fn telemetry_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.telemetry_endpoint = Some(endpoint.into());
        self
    }

    /// Called once per page of multi-page results above the progress threshold
    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(PageProgress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Build the `GitHubClient`
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::with_defaults()
                    .map_err(|e| GitHubError::Config(format!("HTTP client setup failed: {e}")))?,
            ),
        };
        let context = self
            .context
            .unwrap_or_else(|| Arc::new(GitHubContext::load_default()));

        let mut pipeline = RequestPipeline::new(context, Arc::clone(&transport));
        if let Some(endpoint) = self.telemetry_endpoint {
            let reporter = TelemetryReporter::new(transport).with_endpoint(endpoint);
            pipeline = pipeline.with_telemetry(reporter);
        }
        if let Some(token) = self.token {
            pipeline = pipeline.with_access_token(token);
        }
        if let Some(callback) = self.on_progress {
            pipeline = pipeline.with_progress(callback);
        }

        Ok(GitHubClient { pipeline })
    }
}
