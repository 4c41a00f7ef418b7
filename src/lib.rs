//! `ghcmd` - command library for the GitHub REST API
//!
//! Every operation funnels through one request pipeline that composes URLs
//! for public and enterprise hosts, resolves credentials, polls while the
//! server reports 202, follows `Link` pagination and turns failures into
//! structured errors. Around it sit a persistent configuration store, an
//! encrypted credential cache and opt-in usage telemetry.

// Module declarations
pub mod auth;
pub mod config;
pub mod context;
pub mod github;
pub mod logging;
pub mod runtime;
pub mod telemetry;

// Re-export runtime types
pub use runtime::{AsyncStream, AsyncTask};

// Re-export GitHub client types
pub use github::{GitHubClient, GitHubClientBuilder};

// Re-export GitHub error types
pub use github::{ApiError, GitHubError, GitHubResult};

// Re-export pipeline and model types for public API
pub use github::{
    CodeOfConduct, Decorated, ExecutionResult, GitignoreTemplate, HttpMethod, HttpTransport,
    Issue, License, MarkdownMode, PageProgress, RateLimit, RepositoryLicense, RepositoryRef,
    RequestDescriptor, RequestPipeline, ResourceKind, ResponseBody, User,
};

pub use auth::CredentialStore;
pub use config::{ConfigName, ConfigValue, Configuration, Settings};
pub use context::GitHubContext;
pub use telemetry::TelemetryReporter;
