//! Emoji names usable in markdown.

use std::collections::BTreeMap;

use crate::github::error::GitHubResult;
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::util::spawn_task;
use crate::runtime::AsyncTask;

/// Emoji name to image URL.
pub(crate) fn list_emojis(
    pipeline: RequestPipeline,
) -> AsyncTask<GitHubResult<BTreeMap<String, String>>> {
    spawn_task(async move {
        let descriptor = RequestDescriptor::get("emojis")
            .describe("Getting all GitHub emojis")
            .telemetry_event("GetEmoji");

        pipeline.execute(&descriptor).await?.into_typed()
    })
}
