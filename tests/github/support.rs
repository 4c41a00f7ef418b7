//! Scripted transport and client helpers shared by the GitHub tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ghcmd::github::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use ghcmd::{GitHubClient, GitHubContext, RequestPipeline, Settings};

pub const TELEMETRY_URL: &str = "https://telemetry.test/v2/track";

/// Answers requests from fixed per-URL routes first, then from a queue.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, HttpResponse>>,
    script: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn scripted(responses: Vec<HttpResponse>) -> Arc<Self> {
        let transport = Self::default();
        *transport.script.lock().unwrap() = responses.into();
        Arc::new(transport)
    }

    pub fn routed(routes: Vec<(&str, HttpResponse)>) -> Arc<Self> {
        let transport = Self::default();
        *transport.routes.lock().unwrap() = routes
            .into_iter()
            .map(|(url, response)| (url.to_string(), response))
            .collect();
        Arc::new(transport)
    }

    /// Every request sent so far, telemetry included.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests aimed at the API, telemetry excluded.
    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url != TELEMETRY_URL)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        if let Some(response) = self.routes.lock().unwrap().get(&url) {
            return Ok(response.clone());
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HttpError::Transport(format!("no scripted response for {url}")))
    }
}

pub fn response(status: u16, body: &str, headers: &[(&str, &str)]) -> HttpResponse {
    HttpResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: Bytes::from(body.to_string()),
    }
}

pub fn json(status: u16, value: &Value) -> HttpResponse {
    response(status, &value.to_string(), &[("Content-Type", "application/json")])
}

pub fn empty(status: u16) -> HttpResponse {
    response(status, "", &[])
}

/// Settings with no retry delay so tests do not wait.
pub fn fast_settings() -> Settings {
    Settings {
        retry_delay_seconds: 0,
        ..Settings::default()
    }
}

pub fn context(settings: Settings) -> Arc<GitHubContext> {
    Arc::new(GitHubContext::ephemeral(settings))
}

pub fn pipeline(transport: Arc<MockTransport>, settings: Settings) -> RequestPipeline {
    RequestPipeline::new(context(settings), transport)
}

pub fn client(transport: Arc<MockTransport>, settings: Settings) -> GitHubClient {
    GitHubClient::builder()
        .context(context(settings))
        .transport(transport)
        .telemetry_endpoint(TELEMETRY_URL)
        .personal_token("test-token")
        .build()
        .unwrap()
}
