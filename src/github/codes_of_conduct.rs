//! Codes of conduct.

use crate::github::decorate::{Decorated, ResourceKind};
use crate::github::error::GitHubResult;
use crate::github::models::CodeOfConduct;
use crate::github::pipeline::{RequestDescriptor, RequestPipeline};
use crate::github::repository::RepositoryRef;
use crate::github::util::{decorate_all, path_segment, spawn_stream, spawn_task, tag_repository};
use crate::runtime::{AsyncStream, AsyncTask};

/// Media type under which the codes of conduct API is served.
pub const CODES_OF_CONDUCT_ACCEPT: &str = "application/vnd.github.scarlet-witch-preview+json";

pub(crate) fn list_codes_of_conduct(
    pipeline: RequestPipeline,
) -> AsyncStream<GitHubResult<Decorated<CodeOfConduct>>> {
    spawn_stream(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get("codes_of_conduct")
            .accept(CODES_OF_CONDUCT_ACCEPT)
            .paginated()
            .describe("Getting all Codes of Conduct")
            .telemetry_event("GetCodeOfConduct");

        let values = pipeline.execute_paged(&descriptor).await?;
        decorate_all(values, ResourceKind::CodeOfConduct, None, &settings)
    })
}

pub(crate) fn get_code_of_conduct(
    pipeline: RequestPipeline,
    key: String,
) -> AsyncTask<GitHubResult<Decorated<CodeOfConduct>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!("codes_of_conduct/{}", path_segment(&key)))
            .accept(CODES_OF_CONDUCT_ACCEPT)
            .describe(format!("Getting the {key} Code of Conduct"))
            .telemetry_event("GetCodeOfConduct")
            .telemetry_property("CodeOfConductKey", key.clone());

        let code: CodeOfConduct = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(ResourceKind::CodeOfConduct, code, None, &settings))
    })
}

/// The code of conduct adopted by `repository`.
pub(crate) fn get_repository_code_of_conduct(
    pipeline: RequestPipeline,
    repository: RepositoryRef,
) -> AsyncTask<GitHubResult<Decorated<CodeOfConduct>>> {
    spawn_task(async move {
        let settings = pipeline.settings();
        let descriptor = RequestDescriptor::get(format!(
            "{}/community/code_of_conduct",
            repository.fragment()
        ))
        .accept(CODES_OF_CONDUCT_ACCEPT)
        .describe(format!("Getting the Code of Conduct for {repository}"))
        .telemetry_event("GetCodeOfConduct");
        let descriptor = tag_repository(descriptor, &repository, &settings);

        let code: CodeOfConduct = pipeline.execute(&descriptor).await?.into_typed()?;
        Ok(Decorated::new(
            ResourceKind::CodeOfConduct,
            code,
            Some(&repository),
            &settings,
        ))
    })
}
