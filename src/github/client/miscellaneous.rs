//! Rate limit, markdown, licenses, codes of conduct, gitignore and emoji methods

use std::collections::BTreeMap;

use super::GitHubClient;
use crate::github::decorate::Decorated;
use crate::github::error::GitHubResult;
use crate::github::markdown::MarkdownMode;
use crate::github::models::{
    CodeOfConduct, GitignoreTemplate, License, RateLimit, RepositoryLicense,
};
use crate::github::repository::RepositoryRef;
use crate::runtime::{AsyncStream, AsyncTask};

impl GitHubClient {
    /// Rate limit status for the current credential
    #[must_use]
    pub fn get_rate_limit(&self) -> AsyncTask<GitHubResult<Decorated<RateLimit>>> {
        crate::github::rate_limit::get_rate_limit(self.pipeline.clone())
    }

    /// Render markdown to HTML
    #[must_use]
    pub fn render_markdown(
        &self,
        text: impl Into<String>,
        mode: MarkdownMode,
        context: Option<RepositoryRef>,
    ) -> AsyncTask<GitHubResult<String>> {
        crate::github::markdown::render_markdown(self.pipeline.clone(), text.into(), mode, context)
    }

    #[must_use]
    pub fn list_licenses(&self) -> AsyncStream<GitHubResult<Decorated<License>>> {
        crate::github::licenses::list_licenses(self.pipeline.clone())
    }

    #[must_use]
    pub fn get_license(
        &self,
        key: impl Into<String>,
    ) -> AsyncTask<GitHubResult<Decorated<License>>> {
        crate::github::licenses::get_license(self.pipeline.clone(), key.into())
    }

    /// License detected in a repository
    #[must_use]
    pub fn get_repository_license(
        &self,
        repository: RepositoryRef,
    ) -> AsyncTask<GitHubResult<Decorated<RepositoryLicense>>> {
        crate::github::licenses::get_repository_license(self.pipeline.clone(), repository)
    }

    #[must_use]
    pub fn list_codes_of_conduct(&self) -> AsyncStream<GitHubResult<Decorated<CodeOfConduct>>> {
        crate::github::codes_of_conduct::list_codes_of_conduct(self.pipeline.clone())
    }

    #[must_use]
    pub fn get_code_of_conduct(
        &self,
        key: impl Into<String>,
    ) -> AsyncTask<GitHubResult<Decorated<CodeOfConduct>>> {
        crate::github::codes_of_conduct::get_code_of_conduct(self.pipeline.clone(), key.into())
    }

    /// Code of conduct adopted by a repository
    #[must_use]
    pub fn get_repository_code_of_conduct(
        &self,
        repository: RepositoryRef,
    ) -> AsyncTask<GitHubResult<Decorated<CodeOfConduct>>> {
        crate::github::codes_of_conduct::get_repository_code_of_conduct(
            self.pipeline.clone(),
            repository,
        )
    }

    /// Names of all gitignore templates
    #[must_use]
    pub fn list_gitignore_templates(&self) -> AsyncStream<GitHubResult<String>> {
        crate::github::gitignore::list_gitignore_templates(self.pipeline.clone())
    }

    #[must_use]
    pub fn get_gitignore_template(
        &self,
        name: impl Into<String>,
    ) -> AsyncTask<GitHubResult<Decorated<GitignoreTemplate>>> {
        crate::github::gitignore::get_gitignore_template(self.pipeline.clone(), name.into())
    }

    /// Template source only
    #[must_use]
    pub fn get_gitignore_template_raw(
        &self,
        name: impl Into<String>,
    ) -> AsyncTask<GitHubResult<String>> {
        crate::github::gitignore::get_gitignore_template_raw(self.pipeline.clone(), name.into())
    }

    /// Emoji name to image URL
    #[must_use]
    pub fn list_emojis(&self) -> AsyncTask<GitHubResult<BTreeMap<String, String>>> {
        crate::github::emojis::list_emojis(self.pipeline.clone())
    }
}
