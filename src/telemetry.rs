//! Anonymized usage telemetry.
//!
//! Events and exceptions are posted as Application Insights envelopes. Sending
//! is fire-and-forget: failures are logged and never reach the caller.

use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha512};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Settings;
use crate::github::error::GitHubError;
use crate::github::pipeline::HttpMethod;
use crate::github::pipeline::host::is_enterprise_host;
use crate::github::pipeline::request::JSON_CONTENT_TYPE;
use crate::github::transport::{HttpRequest, HttpTransport};
use crate::runtime::spawn_detached;

/// Ingestion endpoint for telemetry envelopes.
pub const TELEMETRY_ENDPOINT: &str = "https://dc.services.visualstudio.com/v2/track";

const EVENT_ENVELOPE: &str = "Microsoft.ApplicationInsights.Event";
const EXCEPTION_ENVELOPE: &str = "Microsoft.ApplicationInsights.Exception";

/// One-way hash of `value` for inclusion in telemetry.
///
/// Returns the value unchanged when PII protection is disabled.
#[must_use]
pub fn pii_safe(value: &str, disable_pii_protection: bool) -> String {
    if disable_pii_protection {
        return value.to_string();
    }
    hex::encode_upper(Sha512::digest(value.as_bytes()))
}

#[derive(Debug, Serialize)]
struct Envelope {
    name: &'static str,
    time: String,
    #[serde(rename = "iKey")]
    i_key: String,
    tags: BTreeMap<&'static str, String>,
    data: EnvelopeData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeData {
    base_type: &'static str,
    base_data: Value,
}

/// Posts usage events for one context.
pub struct TelemetryReporter {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    session_id: String,
    reminded: AtomicBool,
}

impl std::fmt::Debug for TelemetryReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryReporter")
            .field("endpoint", &self.endpoint)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl TelemetryReporter {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let seed = format!("{}:{nanos}", std::process::id());
        let session_id = pii_safe(&seed, false)[..32].to_string();
        Self {
            transport,
            endpoint: TELEMETRY_ENDPOINT.to_string(),
            session_id,
            reminded: AtomicBool::new(false),
        }
    }

    /// Send to a different ingestion URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether anything would be sent under `settings`.
    #[must_use]
    pub fn is_enabled(settings: &Settings) -> bool {
        !settings.disable_telemetry && !settings.application_insights_key.trim().is_empty()
    }

    /// Queue a usage event.
    pub fn report_event(
        &self,
        settings: &Settings,
        name: &str,
        properties: &BTreeMap<String, String>,
        measurements: &BTreeMap<String, f64>,
    ) {
        if !self.prepare(settings) {
            return;
        }
        let base_data = json!({
            "ver": 2,
            "name": name,
            "properties": self.properties(settings, properties),
            "measurements": measurements,
        });
        self.send(settings, EVENT_ENVELOPE, "EventData", base_data);
    }

    /// Queue an exception report for a failed operation.
    pub fn report_exception(
        &self,
        settings: &Settings,
        operation: &str,
        error: &GitHubError,
        properties: &BTreeMap<String, String>,
    ) {
        if !self.prepare(settings) {
            return;
        }
        let mut props = self.properties(settings, properties);
        props.insert("Operation".into(), operation.to_string());
        if let Some(status) = error.status() {
            props.insert("StatusCode".into(), status.to_string());
        }
        let base_data = json!({
            "ver": 2,
            "handledAt": "UserCode",
            "properties": props,
            "exceptions": [{
                "id": 1,
                "outerId": 0,
                "typeName": error.kind(),
                "message": error.to_string(),
                "hasFullStack": false,
            }],
        });
        self.send(settings, EXCEPTION_ENVELOPE, "ExceptionData", base_data);
    }

    fn prepare(&self, settings: &Settings) -> bool {
        if !Self::is_enabled(settings) {
            return false;
        }
        if !settings.suppress_telemetry_reminder && !self.reminded.swap(true, Ordering::Relaxed) {
            info!(
                "Anonymized usage telemetry is enabled. Set DisableTelemetry to opt out, or \
                 SuppressTelemetryReminder to hide this message."
            );
        }
        true
    }

    fn properties(
        &self,
        settings: &Settings,
        extra: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut props = extra.clone();
        props.insert("CrateVersion".into(), env!("CARGO_PKG_VERSION").into());
        props.insert(
            "HostIsEnterprise".into(),
            is_enterprise_host(&settings.api_host_name).to_string(),
        );
        props.insert(
            "DefaultOwnerSet".into(),
            (!settings.default_owner_name.is_empty()).to_string(),
        );
        props
    }

    fn envelope(
        &self,
        settings: &Settings,
        name: &'static str,
        base_type: &'static str,
        base_data: Value,
    ) -> Envelope {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();
        let mut tags = BTreeMap::new();
        tags.insert("ai.user.id", pii_safe(&user, settings.disable_pii_protection));
        tags.insert("ai.session.id", self.session_id.clone());
        tags.insert("ai.internal.sdkVersion", format!("ghcmd:{}", env!("CARGO_PKG_VERSION")));
        Envelope {
            name,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            i_key: settings.application_insights_key.clone(),
            tags,
            data: EnvelopeData {
                base_type,
                base_data,
            },
        }
    }

    fn send(
        &self,
        settings: &Settings,
        name: &'static str,
        base_type: &'static str,
        base_data: Value,
    ) {
        let envelope = self.envelope(settings, name, base_type, base_data);
        let body = match serde_json::to_vec(&[envelope]) {
            Ok(body) => body,
            Err(e) => {
                debug!("Telemetry envelope could not be serialized: {e}");
                return;
            }
        };
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: vec![("Content-Type".into(), JSON_CONTENT_TYPE.into())],
            body: Some(Bytes::from(body)),
            timeout: None,
        };
        let transport = Arc::clone(&self.transport);
        spawn_detached("telemetry", async move {
            let response = transport.send(request).await.map_err(|e| e.to_string())?;
            if (200..300).contains(&response.status) {
                Ok(())
            } else {
                Err(format!("ingestion endpoint returned {}", response.status))
            }
        });
    }
}
