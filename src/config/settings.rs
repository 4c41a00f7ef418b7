//! Typed settings and their persisted names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::github::error::GitHubError;
use crate::github::pipeline::host::DEFAULT_API_HOST;

/// Every tunable the library reads.
///
/// Persisted as TOML with the PascalCase names returned by
/// [`ConfigName::as_str`]; keys missing from the file take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub api_host_name: String,
    pub application_insights_key: String,
    pub default_owner_name: String,
    pub default_repository_name: String,
    pub disable_logging: bool,
    pub disable_pii_protection: bool,
    pub disable_pipeline_support: bool,
    pub disable_telemetry: bool,
    pub log_path: String,
    pub log_process_id: bool,
    pub log_request_body: bool,
    pub log_time_as_utc: bool,
    pub maximum_retries_when_result_not_ready: u32,
    pub multi_request_progress_threshold: u32,
    pub retry_delay_seconds: u64,
    pub state_change_delay_seconds: u64,
    pub suppress_no_token_warning: bool,
    pub suppress_telemetry_reminder: bool,
    /// 0 disables the per-request timeout.
    pub web_request_timeout_sec: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_host_name: DEFAULT_API_HOST.to_string(),
            application_insights_key: String::new(),
            default_owner_name: String::new(),
            default_repository_name: String::new(),
            disable_logging: false,
            disable_pii_protection: false,
            disable_pipeline_support: false,
            disable_telemetry: false,
            log_path: String::new(),
            log_process_id: false,
            log_request_body: false,
            log_time_as_utc: false,
            maximum_retries_when_result_not_ready: 30,
            multi_request_progress_threshold: 10,
            retry_delay_seconds: 30,
            state_change_delay_seconds: 0,
            suppress_no_token_warning: false,
            suppress_telemetry_reminder: false,
            web_request_timeout_sec: 0,
        }
    }
}

/// Recognized configuration names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigName {
    ApiHostName,
    ApplicationInsightsKey,
    DefaultOwnerName,
    DefaultRepositoryName,
    DisableLogging,
    DisablePiiProtection,
    DisablePipelineSupport,
    DisableTelemetry,
    LogPath,
    LogProcessId,
    LogRequestBody,
    LogTimeAsUtc,
    MaximumRetriesWhenResultNotReady,
    MultiRequestProgressThreshold,
    RetryDelaySeconds,
    StateChangeDelaySeconds,
    SuppressNoTokenWarning,
    SuppressTelemetryReminder,
    WebRequestTimeoutSec,
}

impl ConfigName {
    pub const ALL: [ConfigName; 19] = [
        Self::ApiHostName,
        Self::ApplicationInsightsKey,
        Self::DefaultOwnerName,
        Self::DefaultRepositoryName,
        Self::DisableLogging,
        Self::DisablePiiProtection,
        Self::DisablePipelineSupport,
        Self::DisableTelemetry,
        Self::LogPath,
        Self::LogProcessId,
        Self::LogRequestBody,
        Self::LogTimeAsUtc,
        Self::MaximumRetriesWhenResultNotReady,
        Self::MultiRequestProgressThreshold,
        Self::RetryDelaySeconds,
        Self::StateChangeDelaySeconds,
        Self::SuppressNoTokenWarning,
        Self::SuppressTelemetryReminder,
        Self::WebRequestTimeoutSec,
    ];

    /// Name as it appears in the settings file.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApiHostName => "ApiHostName",
            Self::ApplicationInsightsKey => "ApplicationInsightsKey",
            Self::DefaultOwnerName => "DefaultOwnerName",
            Self::DefaultRepositoryName => "DefaultRepositoryName",
            Self::DisableLogging => "DisableLogging",
            Self::DisablePiiProtection => "DisablePiiProtection",
            Self::DisablePipelineSupport => "DisablePipelineSupport",
            Self::DisableTelemetry => "DisableTelemetry",
            Self::LogPath => "LogPath",
            Self::LogProcessId => "LogProcessId",
            Self::LogRequestBody => "LogRequestBody",
            Self::LogTimeAsUtc => "LogTimeAsUtc",
            Self::MaximumRetriesWhenResultNotReady => "MaximumRetriesWhenResultNotReady",
            Self::MultiRequestProgressThreshold => "MultiRequestProgressThreshold",
            Self::RetryDelaySeconds => "RetryDelaySeconds",
            Self::StateChangeDelaySeconds => "StateChangeDelaySeconds",
            Self::SuppressNoTokenWarning => "SuppressNoTokenWarning",
            Self::SuppressTelemetryReminder => "SuppressTelemetryReminder",
            Self::WebRequestTimeoutSec => "WebRequestTimeoutSec",
        }
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigName {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GitHubError::InvalidInput(format!("unknown configuration name '{s}'")))
    }
}

/// A configuration value of any supported type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Number(u64),
    Text(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        Self::Number(u64::from(n))
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl Settings {
    /// Read one setting by name.
    #[must_use]
    pub fn get(&self, name: ConfigName) -> ConfigValue {
        use ConfigName as N;
        match name {
            N::ApiHostName => self.api_host_name.clone().into(),
            N::ApplicationInsightsKey => self.application_insights_key.clone().into(),
            N::DefaultOwnerName => self.default_owner_name.clone().into(),
            N::DefaultRepositoryName => self.default_repository_name.clone().into(),
            N::DisableLogging => self.disable_logging.into(),
            N::DisablePiiProtection => self.disable_pii_protection.into(),
            N::DisablePipelineSupport => self.disable_pipeline_support.into(),
            N::DisableTelemetry => self.disable_telemetry.into(),
            N::LogPath => self.log_path.clone().into(),
            N::LogProcessId => self.log_process_id.into(),
            N::LogRequestBody => self.log_request_body.into(),
            N::LogTimeAsUtc => self.log_time_as_utc.into(),
            N::MaximumRetriesWhenResultNotReady => {
                self.maximum_retries_when_result_not_ready.into()
            }
            N::MultiRequestProgressThreshold => self.multi_request_progress_threshold.into(),
            N::RetryDelaySeconds => self.retry_delay_seconds.into(),
            N::StateChangeDelaySeconds => self.state_change_delay_seconds.into(),
            N::SuppressNoTokenWarning => self.suppress_no_token_warning.into(),
            N::SuppressTelemetryReminder => self.suppress_telemetry_reminder.into(),
            N::WebRequestTimeoutSec => self.web_request_timeout_sec.into(),
        }
    }

    /// Write one setting by name.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the value's type does not match the setting, or a
    /// number does not fit.
    pub fn set(&mut self, name: ConfigName, value: ConfigValue) -> Result<(), GitHubError> {
        use ConfigName as N;
        match name {
            N::ApiHostName => {
                let host = text(name, value)?;
                if host.trim().is_empty() {
                    return Err(GitHubError::InvalidInput("ApiHostName cannot be empty".into()));
                }
                self.api_host_name = host.trim().to_string();
            }
            N::ApplicationInsightsKey => self.application_insights_key = text(name, value)?,
            N::DefaultOwnerName => self.default_owner_name = text(name, value)?,
            N::DefaultRepositoryName => self.default_repository_name = text(name, value)?,
            N::DisableLogging => self.disable_logging = flag(name, value)?,
            N::DisablePiiProtection => self.disable_pii_protection = flag(name, value)?,
            N::DisablePipelineSupport => self.disable_pipeline_support = flag(name, value)?,
            N::DisableTelemetry => self.disable_telemetry = flag(name, value)?,
            N::LogPath => self.log_path = text(name, value)?,
            N::LogProcessId => self.log_process_id = flag(name, value)?,
            N::LogRequestBody => self.log_request_body = flag(name, value)?,
            N::LogTimeAsUtc => self.log_time_as_utc = flag(name, value)?,
            N::MaximumRetriesWhenResultNotReady => {
                self.maximum_retries_when_result_not_ready = small_number(name, value)?;
            }
            N::MultiRequestProgressThreshold => {
                self.multi_request_progress_threshold = small_number(name, value)?;
            }
            N::RetryDelaySeconds => self.retry_delay_seconds = number(name, value)?,
            N::StateChangeDelaySeconds => self.state_change_delay_seconds = number(name, value)?,
            N::SuppressNoTokenWarning => self.suppress_no_token_warning = flag(name, value)?,
            N::SuppressTelemetryReminder => self.suppress_telemetry_reminder = flag(name, value)?,
            N::WebRequestTimeoutSec => self.web_request_timeout_sec = number(name, value)?,
        }
        Ok(())
    }
}

fn mismatch(name: ConfigName, expected: &str, got: &ConfigValue) -> GitHubError {
    GitHubError::InvalidInput(format!("{name} expects a {expected}, got '{got}'"))
}

fn text(name: ConfigName, value: ConfigValue) -> Result<String, GitHubError> {
    match value {
        ConfigValue::Text(s) => Ok(s),
        other => Err(mismatch(name, "string", &other)),
    }
}

fn flag(name: ConfigName, value: ConfigValue) -> Result<bool, GitHubError> {
    match value {
        ConfigValue::Bool(b) => Ok(b),
        other => Err(mismatch(name, "boolean", &other)),
    }
}

fn number(name: ConfigName, value: ConfigValue) -> Result<u64, GitHubError> {
    match value {
        ConfigValue::Number(n) => Ok(n),
        other => Err(mismatch(name, "number", &other)),
    }
}

fn small_number(name: ConfigName, value: ConfigValue) -> Result<u32, GitHubError> {
    let n = number(name, value)?;
    u32::try_from(n)
        .map_err(|_| GitHubError::InvalidInput(format!("{name} value {n} is out of range")))
}
