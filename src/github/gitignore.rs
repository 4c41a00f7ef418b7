//! `.gitignore` templates.

use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::{GitHubError, GitHubResult};
use crate::github::models::GitignoreTemplate;
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::util::{path_segment, spawn_stream, spawn_task};
use crate::runtime::{AsyncStream, AsyncTask};

/// Media type that returns the template source as plain text.
pub const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

/// Names of every available template.
pub(crate) fn list_gitignore_templates(
    pipeline: RequestPipeline,
) -> AsyncStream<GitHubResult<String>> {
    spawn_stream(async move {
        let descriptor = RequestDescriptor::get("gitignore/templates")
            .paginated()
            .describe("Getting all gitignore templates")
            .telemetry_event("GetGitIgnoreTemplate");

        pipeline
            .execute_paged(&descriptor)
            .await?
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(name) => Ok(name),
                other => Err(GitHubError::Decode(format!(
                    "expected a template name, got {other}"
                ))),
            })
            .collect()
    })
}

fn template_descriptor(name: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("gitignore/templates/{}", path_segment(name)))
        .describe(format!("Getting {name} gitignore template"))
        .telemetry_event("GetGitIgnoreTemplate")
        .telemetry_property("Name", name)
}

/// One template with its name and source.
pub(crate) fn get_gitignore_template(
    pipeline: RequestPipeline,
    name: String,
) -> AsyncTask<GitHubResult<Decorated<GitignoreTemplate>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = template_descriptor(&name);

        let template: GitignoreTemplate = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(ResourceKind::GitignoreTemplate, template, None, &settings))
    })
}

/// One template's source only, as served in raw form.
pub(crate) fn get_gitignore_template_raw(
    pipeline: RequestPipeline,
    name: String,
) -> AsyncTask<GitHubResult<String>> {
    spawn_task(async move {
        let descriptor = template_descriptor(&name).accept(RAW_ACCEPT);
        Ok(pipeline.execute(&descriptor).await?.body.as_text())
    })
}
