//! Best-effort forwarding of report summaries to the log ingestion service.
//!
//! [`LogForwarder`] posts one JSON [`IngestEntry`] per accepted report with
//! bearer-token authorization. There is no retry: a failed attempt is
//! returned to the caller, which logs it and moves on.

use std::fmt;
use std::time::Duration;

use bug_report_core::report::BugReport;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::json;

/// Default ingestion endpoint.
pub const DEFAULT_INGEST_URL: &str = "https://logging.scenextras.com/api/v1/ingest";

/// Service name attached to every forwarded entry.
pub const SERVICE_NAME: &str = "bug-report-api";

/// Channel under which forwarded entries are filed.
pub const CHANNEL: &str = "bug-report";

/// HTTP timeout for a single forward.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for forwarding failures.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The ingestion service returned a non-2xx status code.
    #[error("Log ingestion returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The JSON body accepted by the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestEntry {
    pub time: String,
    pub service: String,
    pub level: String,
    pub message: String,
    pub channel: String,
    pub context: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl IngestEntry {
    /// Summarize a stored report.
    pub fn from_report(report: &BugReport) -> Self {
        Self {
            time: report.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            service: SERVICE_NAME.to_string(),
            level: "info".to_string(),
            message: format!("Bug report submitted: {}", report.title),
            channel: CHANNEL.to_string(),
            context: json!({
                "report_id": report.id,
                "title": report.title,
                "current_route": report.current_route,
                "platform": report.device_info.platform,
                "app_version": report.device_info.app_version,
                "has_screenshot": report.has_screenshot(),
                "navigation_history": report.navigation_history,
            }),
            trace_id: report.trace_id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// LogForwarder
// ---------------------------------------------------------------------------

/// Posts report summaries to the log ingestion service.
pub struct LogForwarder {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl LogForwarder {
    /// Create a forwarder for `url` authenticated with `api_key`.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    /// Forward the summary of `report`.
    pub async fn forward_report(&self, report: &BugReport) -> Result<(), ForwardError> {
        self.send(&IngestEntry::from_report(report)).await
    }

    /// Execute a single POST request and check the response status.
    pub async fn send(&self, entry: &IngestEntry) -> Result<(), ForwardError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(entry)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ForwardError::HttpStatus(response.status().as_u16()));
        }
        tracing::debug!(url = %self.url, channel = %entry.channel, "Forwarded log entry");
        Ok(())
    }
}

impl fmt::Debug for LogForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogForwarder")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
