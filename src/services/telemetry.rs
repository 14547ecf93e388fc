use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;

/// Timeout for one shipment to the log sink. Generous relative to provider
/// calls since nothing waits on it.
const SINK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Structured entry POSTed to the remote log sink.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

/// Fire-and-forget client for the remote log sink.
///
/// Shipping happens on a detached task: the request path never waits for the
/// sink, and every sink failure (its own timeout included) is swallowed after
/// a local trace line. An unconfigured or disabled sink makes `emit` a no-op.
#[derive(Clone)]
pub struct RemoteLogger {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    service: String,
    enabled: bool,
}

impl RemoteLogger {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.log_service_url.clone(),
            api_key: config.log_service_api_key.clone(),
            service: config.service_name.clone(),
            enabled: config.remote_logging_enabled,
        }
    }

    /// A logger that never ships anything. Used by tests.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
            api_key: None,
            service: "ipinfo-api".to_string(),
            enabled: false,
        }
    }

    /// Queue one entry for shipment and return immediately.
    pub fn emit(&self, level: LogLevel, message: impl Into<String>, request_id: &str, metadata: Value) {
        let message = message.into();

        if !self.enabled {
            tracing::debug!(%message, "remote logging disabled, skipping");
            return;
        }

        let (Some(endpoint), Some(api_key)) = (self.endpoint.clone(), self.api_key.clone()) else {
            tracing::debug!(%message, "log sink not configured, skipping");
            return;
        };

        let entry = LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            message,
            service: self.service.clone(),
            request_id: Some(request_id.to_string()),
            metadata,
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .post(format!("{endpoint}/api/logs"))
                .header("x-api-key", api_key)
                .timeout(SINK_TIMEOUT)
                .json(&entry)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(level = ?entry.level, "log entry shipped");
                }
                Ok(response) => {
                    tracing::warn!(status = %response.status(), "log sink rejected entry");
                }
                Err(err) => {
                    tracing::warn!(error = %err.without_url(), "failed to ship log entry");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_entry_serialization_shape() {
        let entry = LogEntry {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            level: LogLevel::Warn,
            message: "all providers exhausted".to_string(),
            service: "ipinfo-api".to_string(),
            request_id: Some("req-1".to_string()),
            metadata: json!({ "ip": "8.8.8.8" }),
        };

        let value = serde_json::to_value(&entry).unwrap_or_default();
        assert_eq!(value["level"], "warn");
        assert_eq!(value["service"], "ipinfo-api");
        assert_eq!(value["request_id"], "req-1");
        assert_eq!(value["metadata"]["ip"], "8.8.8.8");
    }

    #[test]
    fn test_null_metadata_is_omitted() {
        let entry = LogEntry {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            level: LogLevel::Info,
            message: "request".to_string(),
            service: "ipinfo-api".to_string(),
            request_id: None,
            metadata: Value::Null,
        };

        let value = serde_json::to_value(&entry).unwrap_or_default();
        assert!(value.get("metadata").is_none());
        assert!(value.get("request_id").is_none());
    }

    #[test]
    fn test_disabled_logger_is_inert_without_runtime() {
        // emit must not touch tokio when shipping is off
        RemoteLogger::disabled().emit(LogLevel::Info, "noop", "req-1", Value::Null);
    }
}
