//! Open source license metadata.

use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::GitHubResult;
use crate::github::models::{License, RepositoryLicense};
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::repository::RepositoryRef;
use crate::github::util::{decorate_all, path_segment, spawn_stream, spawn_task, tag_repository};
use crate::runtime::{AsyncStream, AsyncTask};

/// Commonly used licenses, in summary form.
pub(crate) fn list_licenses(
    pipeline: RequestPipeline,
) -> AsyncStream<GitHubResult<Decorated<License>>> {
    spawn_stream(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get("licenses")
            .paginated()
            .describe("Getting all licenses")
            .telemetry_event("GetLicense");

        let values = pipeline.execute_paged(&descriptor).await?;
        decorate_all(values, ResourceKind::License, None, &settings)
    })
}

/// One license, including its full text.
pub(crate) fn get_license(
    pipeline: RequestPipeline,
    key: String,
) -> AsyncTask<GitHubResult<Decorated<License>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!("licenses/{}", path_segment(&key)))
            .describe(format!("Getting the {key} license"))
            .telemetry_event("GetLicense")
            .telemetry_property("LicenseKey", key.clone());

        let license: License = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(ResourceKind::License, license, None, &settings))
    })
}

/// The license file detected in `repository`.
pub(crate) fn get_repository_license(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
) -> AsyncTask<GitHubResult<Decorated<RepositoryLicense>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!("{}/license", repository.fragment()))
            .describe(format!("Getting repository license for {repository}"))
            .telemetry_event("GetLicense");
        let descriptor = tag_repository(descriptor, &repository, &settings);

        let license: RepositoryLicense = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(
            ResourceKind::RepositoryLicense,
            license,
            Some(&repository),
            &settings,
        ))
    })
}
