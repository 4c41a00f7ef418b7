//! Rate limit status.

use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::GitHubResult;
use crate::github::models::RateLimit;
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::util::spawn_task;
use crate::runtime::AsyncTask;

/// Current rate limit status for the resolved credential.
///
/// Querying this endpoint does not count against the limit.
pub(crate) fn get_rate_limit(
    pipeline: RequestPipeline,
) -> AsyncTask<GitHubResult<Decorated<RateLimit>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get("rate_limit")
            .describe("Getting rate limit status")
            .telemetry_event("GetRateLimit");

        let limits: RateLimit = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(ResourceKind::RateLimit, limits, None, &settings))
    })
}
