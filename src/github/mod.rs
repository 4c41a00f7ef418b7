//! GitHub API operations module
//!
//! Every operation builds a [`RequestDescriptor`] and runs it through the
//! shared [`RequestPipeline`]; results come back as typed, decorated values.

pub mod client;
pub mod decorate;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod repository;
pub mod transport;
pub mod util;

// Re-export client types
pub use client::{GitHubClient, GitHubClientBuilder};

// Re-export error types
pub use error::{ApiError, GitHubError, GitHubResult};
pub use util::spawn_task;

pub use decorate::{Decorated, ResourceKind};
pub use models::{
    CodeOfConduct, GitignoreTemplate, Issue, License, RateLimit, RateLimitEntry,
    RateLimitResources, RepositoryLicense, User,
};
pub use pipeline::{
    ExecutionResult, HttpMethod, PageProgress, RequestDescriptor, RequestPipeline, ResponseBody,
};
pub use repository::RepositoryRef;
pub use transport::{HttpError, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub use codes_of_conduct::CODES_OF_CONDUCT_ACCEPT;
pub use gitignore::RAW_ACCEPT;
pub use markdown::MarkdownMode;

// GitHub API operations (internal)
pub(crate) mod assignees;
pub(crate) mod codes_of_conduct;
pub(crate) mod emojis;
pub(crate) mod gitignore;
pub(crate) mod licenses;
pub(crate) mod markdown;
pub(crate) mod rate_limit;
