//! Issue assignee operations.

use serde_json::json;

use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::{GitHubError, GitHubResult};
use crate::github::models::{Issue, User};
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::repository::RepositoryRef;
use crate::github::util::{decorate_all, path_segment, spawn_stream, spawn_task, tag_repository};
use crate::runtime::{AsyncStream, AsyncTask};

/// Users who can be assigned to issues in `repository`.
pub(crate) fn list_assignees(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
) -> AsyncStream<GitHubResult<Decorated<User>>> {
    spawn_stream(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!("{}/assignees", repository.fragment()))
            .paginated()
            .describe(format!("Getting assignee list for {repository}"))
            .telemetry_event("ListAssignees");
        let descriptor = tag_repository(descriptor, &repository, &settings);

        let values = pipeline.execute_paged(&descriptor).await?;
        decorate_all(values, ResourceKind::User, Some(&repository), &settings)
    })
}

/// Whether `login` can be assigned to issues in `repository`.
///
/// The API answers 204 for an assignable user and 404 otherwise; any other
/// failure is returned as an error.
pub(crate) fn test_assignee(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
    login: String,
) -> AsyncTask<GitHubResult<bool>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!(
            "{}/assignees/{}",
            repository.fragment(),
            path_segment(&login)
        ))
        .describe(format!("Checking if {login} is an assignee for {repository}"))
        .telemetry_event("TestAssignee");
        let descriptor = tag_repository(descriptor, &repository, &settings);

        match pipeline.execute(&descriptor).await {
            Ok(_) => Ok(true),
            Err(GitHubError::Api(e)) if e.is_status(404) => Ok(false),
            Err(e) => Err(e),
        }
    })
}

/// Add `logins` to the assignees of issue `issue`.
pub(crate) fn add_assignees(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
    issue: u64,
    logins: Vec<String>,
) -> AsyncTask<GitHubResult<Decorated<Issue>>> {
    change_assignees(pipeline, repository, issue, logins, true)
}

/// Remove `logins` from the assignees of issue `issue`.
pub(crate) fn remove_assignees(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
    issue: u64,
    logins: Vec<String>,
) -> AsyncTask<GitHubResult<Decorated<Issue>>> {
    change_assignees(pipeline, repository, issue, logins, false)
}

fn change_assignees(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
    issue: u64,
    logins: Vec<String>,
    add: bool,
) -> AsyncTask<GitHubResult<Decorated<Issue>>> {
    spawn_task(async move {
        if logins.iter().all(|l| l.trim().is_empty()) {
            return Err(GitHubError::InvalidInput(
                "at least one assignee login is required".into(),
            ));
        }
        if logins.iter().any(|l| l.trim().is_empty()) {
            return Err(GitHubError::InvalidInput("assignee logins must not be blank".into()));
        }
        let settings = pipeline.settings();
        let fragment = format!("{}/issues/{issue}/assignees", repository.fragment());
        let (descriptor, verb, event) = if add {
            (RequestDescriptor::post(fragment), "Adding", "AddAssignees")
        } else {
            (RequestDescriptor::delete(fragment), "Removing", "RemoveAssignees")
        };
        let descriptor = descriptor
            .json_body(&json!({ "assignees": logins }))?
            .describe(format!(
                "{verb} assignees {} on issue #{issue} in {repository}",
                logins.join(", ")
            ))
            .telemetry_event(event)
            .telemetry_property("AssigneeCount", logins.len().to_string());
        let descriptor = tag_repository(descriptor, &repository, &settings);

        let updated: Issue = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(ResourceKind::Issue, updated, Some(&repository), &settings))
    })
}
