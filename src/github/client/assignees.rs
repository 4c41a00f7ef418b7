//! Assignees API methods

use super::GitHubClient;
use crate::github::decorate::Decorated;
use crate::github::error::GitHubResult;
use crate::github::models::{Issue, User};
use crate::github::repository::RepositoryRef;
use crate::runtime::{AsyncStream, AsyncTask};

impl GitHubClient {
    /// Users who can be assigned to issues in a repository
    #[must_use]
    pub fn list_assignees(
        &self,
        repository: RepositoryRef,
    ) -> AsyncStream<GitHubResult<Decorated<User>>> {
        crate::github::assignees::list_assignees(self.pipeline.clone(), repository)
    }

    /// Whether a user can be assigned to issues in a repository
    #[must_use]
    pub fn test_assignee(
        &self,
        repository: RepositoryRef,
        login: impl Into<String>,
    ) -> AsyncTask<GitHubResult<bool>> {
        crate::github::assignees::test_assignee(self.pipeline.clone(), repository, login.into())
    }

    /// Add assignees to an issue
    #[must_use]
    pub fn add_assignees(
        &self,
        repository: RepositoryRef,
        issue: u64,
        logins: Vec<String>,
    ) -> AsyncTask<GitHubResult<Decorated<Issue>>> {
        crate::github::assignees::add_assignees(self.pipeline.clone(), repository, issue, logins)
    }

    /// Remove assignees from an issue
    #[must_use]
    pub fn remove_assignees(
        &self,
        repository: RepositoryRef,
        issue: u64,
        logins: Vec<String>,
    ) -> AsyncTask<GitHubResult<Decorated<Issue>>> {
        crate::github::assignees::remove_assignees(self.pipeline.clone(), repository, issue, logins)
    }
}
