//! GitHub API utilities

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;

use crate::config::Settings;
use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::GitHubResult;
use crate::github::pipeline::RequestDescriptor;
use crate::github::repository::RepositoryRef;
use crate::runtime::{AsyncStream, AsyncTask};

/// Spawn an async task for a GitHub API operation.
#[inline]
pub fn spawn_task<T, F>(work: F) -> AsyncTask<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    AsyncTask::spawn_async(work)
}

/// Spawn a paged GitHub API operation and stream its items.
#[inline]
pub fn spawn_stream<T, E, F>(work: F) -> AsyncStream<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Future<Output = Result<Vec<T>, E>> + Send + 'static,
{
    AsyncStream::from_batch(work)
}

/// Percent-encode one path segment (login, template name, license key).
#[inline]
#[must_use]
pub fn path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Add the repository's owner and name to the descriptor's usage properties.
pub(crate) fn tag_repository(
    descriptor: RequestDescriptor,
    repository: &RepositoryRef,
    settings: &Settings,
) -> RequestDescriptor {
    repository
        .telemetry_properties(settings)
        .into_iter()
        .fold(descriptor, |d, (key, value)| d.telemetry_property(key, value))
}

/// Deserialize and decorate every element of a paged result.
pub(crate) fn decorate_all<T: DeserializeOwned>(
    values: Vec<Value>,
    kind: ResourceKind,
    repository: Option<&RepositoryRef>,
    settings: &Settings,
) -> GitHubResult<Vec<Decorated<T>>> {
    values
        .into_iter()
        .map(|value| {
            let typed: T = serde_json::from_value(value)?;
            Ok(Decorated::new(kind, typed, repository, settings))
        })
        .collect()
}
