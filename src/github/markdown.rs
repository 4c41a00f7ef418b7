//! Markdown rendering.

use serde::Serialize;

use crate::github::error::GitHubResult;
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::repository::RepositoryRef;
use crate::github::util::spawn_task;
use crate::runtime::AsyncTask;

/// How the server interprets the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownMode {
    /// Plain document rendering, as for a README
    #[default]
    Markdown,
    /// Comment-style rendering; issue and user references are linked
    Gfm,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    text: &'a str,
    mode: MarkdownMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

/// Render `text` to HTML.
///
/// `context` only matters in `Gfm` mode, where it is the repository that
/// bare `#123` references resolve against.
pub(crate) fn render_markdown(
    pipeline: RequestPipeline,
    text: String,
    mode: MarkdownMode,
    context: Option<RepositoryRef>,
) -> AsyncTask<GitHubResult<String>> {
    spawn_task(async move {
        let request = RenderRequest {
            text: &text,
            mode,
            context: context.as_ref().map(ToString::to_string),
        };
        let descriptor = RequestDescriptor::post("markdown")
            .json_body(&request)?
            .accept("text/html")
            .describe("Converting Markdown to HTML")
            .telemetry_event("ConvertFromMarkdown");

        let result = pipeline.execute(&descriptor).await?;
        Ok(result.body.as_text())
    })
}
