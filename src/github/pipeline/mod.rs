//! The request pipeline: the single path every API call takes.
//!
//! A [`RequestDescriptor`] goes in; the pipeline composes the URL for the
//! configured host, resolves the access token, sends the request through the
//! [`HttpTransport`], polls while the server answers 202, follows `Link`
//! pagination when asked to, and translates failures into [`GitHubError`].

pub mod host;
pub mod links;
pub mod request;
pub mod response;

pub use host::{DEFAULT_API_HOST, api_root, compose_url, is_enterprise_host};
pub use links::{PageLinks, should_report_progress};
pub use request::{DEFAULT_ACCEPT, HttpMethod, JSON_CONTENT_TYPE, RequestDescriptor};
pub use response::{ExecutionResult, ResponseBody};

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::context::GitHubContext;
use crate::github::error::{ApiError, GitHubError, GitHubResult};
use crate::github::transport::{HttpRequest, HttpTransport};
use crate::telemetry::TelemetryReporter;
use response::Exchange;

/// `User-Agent` sent with every request; the API rejects requests without one.
pub const USER_AGENT: &str = concat!("ghcmd/", env!("CARGO_PKG_VERSION"));

/// Progress of a multi-page request, reported once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// 1-based page just received
    pub page: u32,
    /// Estimate taken from the first page's `rel="last"` link
    pub total_pages: u32,
    /// Elements accumulated so far
    pub items: usize,
}

/// Observer for [`PageProgress`].
pub type ProgressCallback = Arc<dyn Fn(PageProgress) + Send + Sync>;

/// Per-call snapshot of everything resolved before the first send.
struct CallState {
    settings: Settings,
    token: Option<SecretString>,
}

/// Executes request descriptors. Cloning is cheap.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    context: Arc<GitHubContext>,
    telemetry: Arc<TelemetryReporter>,
    access_token: Option<Arc<SecretString>>,
    on_progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("context", &self.context)
            .field("telemetry", &self.telemetry)
            .field("has_explicit_token", &self.access_token.is_some())
            .field("has_progress_callback", &self.on_progress.is_some())
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    /// Pipeline whose telemetry shares `transport`.
    #[must_use]
    pub fn new(context: Arc<GitHubContext>, transport: Arc<dyn HttpTransport>) -> Self {
        let telemetry = Arc::new(TelemetryReporter::new(Arc::clone(&transport)));
        Self {
            transport,
            context,
            telemetry,
            access_token: None,
            on_progress: None,
        }
    }

    /// Token used in preference to any cached or stored credential.
    #[must_use]
    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(Arc::new(token));
        self
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: TelemetryReporter) -> Self {
        self.telemetry = Arc::new(telemetry);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    #[must_use]
    pub fn context(&self) -> &Arc<GitHubContext> {
        &self.context
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.context.config().snapshot()
    }

    /// Perform one logical exchange, polling while the server answers 202.
    ///
    /// # Errors
    ///
    /// `Api` for transport failures and non-2xx responses, `RetryExhausted`
    /// when every permitted retry still answered 202, `InvalidInput` for a
    /// malformed descriptor.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> GitHubResult<ExecutionResult> {
        let call = self.begin(descriptor)?;
        let url = compose_url(&call.settings.api_host_name, &descriptor.uri_fragment);
        let started = Instant::now();

        let result = self.until_ready(descriptor, &url, &call).await;

        self.record(descriptor, &call.settings, started, None, result.as_ref().err());
        result
    }

    /// Perform a logical exchange and aggregate every page into one sequence.
    ///
    /// Array pages are concatenated in the order received. A first page that
    /// is a single JSON object is returned as a one-element sequence.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), for any page.
    pub async fn execute_paged(&self, descriptor: &RequestDescriptor) -> GitHubResult<Vec<Value>> {
        let call = self.begin(descriptor)?;
        let started = Instant::now();

        let result = self.collect_pages(descriptor, &call).await;

        let count = result.as_ref().ok().map(Vec::len);
        self.record(descriptor, &call.settings, started, count, result.as_ref().err());
        result
    }

    fn begin(&self, descriptor: &RequestDescriptor) -> GitHubResult<CallState> {
        descriptor.validate()?;
        let settings = self.context.config().snapshot();
        let token = self.context.credentials().resolve(
            self.access_token.as_deref(),
            settings.suppress_no_token_warning,
        );
        Ok(CallState { settings, token })
    }

    async fn collect_pages(
        &self,
        descriptor: &RequestDescriptor,
        call: &CallState,
    ) -> GitHubResult<Vec<Value>> {
        let follow_up = descriptor.next_page();
        let mut url = compose_url(&call.settings.api_host_name, &descriptor.uri_fragment);
        let mut items = Vec::new();
        let mut visited = HashSet::from([url.clone()]);
        let mut page = 1u32;
        let mut total_pages = None;

        loop {
            let current = if page == 1 { descriptor } else { &follow_up };
            let result = self.until_ready(current, &url, call).await?;
            let links = result.links();

            if page == 1 {
                let estimate = links.last_page();
                let threshold = call.settings.multi_request_progress_threshold;
                if should_report_progress(threshold, estimate) {
                    total_pages = estimate;
                }
            }

            let values = match result.body {
                ResponseBody::Json(Value::Array(values)) => values,
                ResponseBody::Json(single) if page == 1 => {
                    items.push(single);
                    break;
                }
                ResponseBody::Empty if page == 1 => break,
                ResponseBody::Raw(raw) if page == 1 => {
                    return Err(GitHubError::Decode(format!(
                        "{} returned {} bytes of non-JSON content",
                        descriptor.label(),
                        raw.len()
                    )));
                }
                _ => {
                    debug!(
                        "{}: page {page} is not an array; treating it as the end of the results",
                        descriptor.label()
                    );
                    break;
                }
            };
            items.extend(values);

            if let (Some(total), Some(callback)) = (total_pages, &self.on_progress) {
                callback(PageProgress {
                    page,
                    total_pages: total,
                    items: items.len(),
                });
            }

            match links.next {
                Some(next) if descriptor.accept_pagination => {
                    if !visited.insert(next.clone()) {
                        warn!("{}: next link revisits {next}; stopping", descriptor.label());
                        break;
                    }
                    debug!("{}: following next page {next}", descriptor.label());
                    url = next;
                    page += 1;
                }
                _ => break,
            }
        }

        Ok(items)
    }

    /// Re-issue the request while a GET answers 202, honoring the delay between attempts.
    async fn until_ready(
        &self,
        descriptor: &RequestDescriptor,
        url: &str,
        call: &CallState,
    ) -> GitHubResult<ExecutionResult> {
        let max_retries = descriptor
            .max_retries
            .unwrap_or(call.settings.maximum_retries_when_result_not_ready);
        let delay = descriptor
            .retry_delay
            .unwrap_or_else(|| Duration::from_secs(call.settings.retry_delay_seconds));

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.exchange(descriptor, url, call).await? {
                Exchange::Ready(result) => return Ok(result),
                Exchange::NotReady if attempts > max_retries => {
                    return Err(GitHubError::RetryExhausted {
                        attempts,
                        descriptor: Box::new(descriptor.clone()),
                    });
                }
                Exchange::NotReady => {
                    info!(
                        "{}: result not ready (HTTP 202); \
                         retry {attempts} of {max_retries} in {delay:?}",
                        descriptor.label()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn exchange(
        &self,
        descriptor: &RequestDescriptor,
        url: &str,
        call: &CallState,
    ) -> GitHubResult<Exchange> {
        let request = build_request(descriptor, url, call);
        log_request(descriptor, &request, call.settings.log_request_body);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::transport(descriptor, e.to_string()))?;

        match response.status {
            202 if !descriptor.method.is_mutating() => {
                debug!("{}: HTTP 202 from {url}", descriptor.label());
                Ok(Exchange::NotReady)
            }
            status @ 200..=299 => {
                if status == 202 {
                    // Re-sending a mutating request could repeat its side effect.
                    warn!(
                        "{}: server accepted the request but the result is not ready yet",
                        descriptor.label()
                    );
                }
                let settle = call.settings.state_change_delay_seconds;
                if descriptor.method.is_mutating() && settle > 0 {
                    tokio::time::sleep(Duration::from_secs(settle)).await;
                }
                Ok(Exchange::Ready(ExecutionResult::decode(
                    status,
                    response.headers,
                    response.body,
                    descriptor.expects_json(),
                )))
            }
            status => {
                let request_id = response.header("X-GitHub-Request-Id").map(str::to_string);
                let error = ApiError::from_response(descriptor, status, &response.body, request_id);
                debug!("{}: {}", descriptor.label(), error.detailed_message());
                Err(error.into())
            }
        }
    }

    fn record(
        &self,
        descriptor: &RequestDescriptor,
        settings: &Settings,
        started: Instant,
        item_count: Option<usize>,
        error: Option<&GitHubError>,
    ) {
        let Some(event) = descriptor.telemetry_event_name.as_deref() else {
            return;
        };
        match error {
            Some(e) => {
                self.telemetry
                    .report_exception(settings, event, e, &descriptor.telemetry_properties);
            }
            None => {
                let mut measurements = BTreeMap::new();
                measurements.insert("Duration".to_string(), started.elapsed().as_secs_f64());
                if let Some(count) = item_count {
                    measurements.insert("ItemCount".to_string(), count as f64);
                }
                self.telemetry.report_event(
                    settings,
                    event,
                    &descriptor.telemetry_properties,
                    &measurements,
                );
            }
        }
    }
}

fn build_request(descriptor: &RequestDescriptor, url: &str, call: &CallState) -> HttpRequest {
    let mut headers = vec![
        ("Accept".to_string(), descriptor.accept_header().to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
    ];
    if let Some(token) = &call.token {
        headers.push((
            "Authorization".to_string(),
            format!("token {}", token.expose_secret()),
        ));
    }
    if descriptor.body.is_some() {
        headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
    }
    for (name, value) in &descriptor.headers {
        if name.eq_ignore_ascii_case("Authorization") {
            continue;
        }
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }

    let timeout = match call.settings.web_request_timeout_sec {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    HttpRequest {
        method: descriptor.method,
        url: url.to_string(),
        headers,
        body: descriptor.body.clone(),
        timeout,
    }
}

fn log_request(descriptor: &RequestDescriptor, request: &HttpRequest, log_body: bool) {
    debug!(
        "Executing: {} {} ({})",
        request.method.as_str(),
        request.url,
        descriptor.label()
    );
    if let Some(body) = &request.body {
        if log_body {
            debug!("Request body: {}", String::from_utf8_lossy(body));
        } else {
            debug!("Request body: <{} bytes, not logged>", body.len());
        }
    }
}
