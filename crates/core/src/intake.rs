//! Turning a raw form submission into a validated [`BugReport`].
//!
//! Client applications post every field as a plain string; structured
//! fields (`navigationHistory`, `logs`, `deviceInfo`, `userInfo`) carry JSON
//! inside those strings. All checks here run before the caller performs any
//! side effect, so a rejected submission never touches storage.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CoreError;
use crate::report::{generate_report_id, BugReport, DeviceInfo, LogEntry, UserInfo};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Form field names
// ---------------------------------------------------------------------------

pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_STEPS_TO_REPRODUCE: &str = "stepsToReproduce";
pub const FIELD_CURRENT_ROUTE: &str = "currentRoute";
pub const FIELD_NAVIGATION_HISTORY: &str = "navigationHistory";
pub const FIELD_LOGS: &str = "logs";
pub const FIELD_DEVICE_INFO: &str = "deviceInfo";
pub const FIELD_USER_INFO: &str = "userInfo";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_TRACE_ID: &str = "traceId";
/// The binary file part carrying an optional screenshot.
pub const FIELD_SCREENSHOT: &str = "screenshot";

/// Level assigned to the synthetic entry produced from unstructured log text.
pub const RAW_LOG_LEVEL: &str = "info";

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// The text fields of one multipart submission, exactly as received.
///
/// A missing field and an empty field are treated the same way.
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub title: String,
    pub description: String,
    pub steps_to_reproduce: String,
    pub current_route: String,
    pub navigation_history: String,
    pub logs: String,
    pub device_info: String,
    pub user_info: String,
    pub timestamp: String,
    pub trace_id: String,
}

impl ReportSubmission {
    /// Record a form field by its wire name. Unknown names are ignored.
    ///
    /// Returns `false` when the field name is not part of the submission
    /// schema so the caller can log it.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            FIELD_TITLE => &mut self.title,
            FIELD_DESCRIPTION => &mut self.description,
            FIELD_STEPS_TO_REPRODUCE => &mut self.steps_to_reproduce,
            FIELD_CURRENT_ROUTE => &mut self.current_route,
            FIELD_NAVIGATION_HISTORY => &mut self.navigation_history,
            FIELD_LOGS => &mut self.logs,
            FIELD_DEVICE_INFO => &mut self.device_info,
            FIELD_USER_INFO => &mut self.user_info,
            FIELD_TIMESTAMP => &mut self.timestamp,
            FIELD_TRACE_ID => &mut self.trace_id,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Validate the submission and build a new report with a fresh id.
    ///
    /// `now` stands in for the client timestamp when that is missing or
    /// unparseable, and stamps the synthetic entry of raw-text logs.
    pub fn into_report(self, now: Timestamp) -> Result<BugReport, CoreError> {
        validate_required(&self.title, &self.description, &self.current_route)?;

        let timestamp = parse_timestamp(&self.timestamp, now);
        let navigation_history = parse_navigation_history(&self.navigation_history)?;
        let logs = parse_logs(&self.logs, now);
        let device_info = parse_device_info(&self.device_info)?;
        let user_info = parse_user_info(&self.user_info)?;

        Ok(BugReport {
            id: generate_report_id(),
            title: self.title,
            description: self.description,
            steps_to_reproduce: non_empty(self.steps_to_reproduce),
            current_route: self.current_route,
            navigation_history,
            logs,
            device_info,
            user_info,
            timestamp,
            trace_id: non_empty(self.trace_id),
            screenshot_url: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Reject the submission when any required text field is blank.
pub fn validate_required(
    title: &str,
    description: &str,
    current_route: &str,
) -> Result<(), CoreError> {
    let missing: Vec<&str> = [
        (FIELD_TITLE, title),
        (FIELD_DESCRIPTION, description),
        (FIELD_CURRENT_ROUTE, current_route),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Parse an RFC 3339 timestamp, falling back to `now` on any failure.
///
/// The result is normalized to UTC; the client's offset is not kept.
pub fn parse_timestamp(raw: &str, now: Timestamp) -> Timestamp {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Parse the JSON array of visited routes.
pub fn parse_navigation_history(raw: &str) -> Result<Vec<String>, CoreError> {
    serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("Invalid navigationHistory JSON: {e}")))
}

/// Parse client logs.
///
/// A JSON array of entries is decoded as-is and JSON `null` yields no
/// entries. Anything else that is not empty, including a JSON object,
/// becomes a single `info` entry holding the raw text.
pub fn parse_logs(raw: &str, now: Timestamp) -> Vec<LogEntry> {
    if raw.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Option<Vec<LogEntry>>>(raw) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(_) => vec![LogEntry {
            level: RAW_LOG_LEVEL.to_string(),
            message: raw.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            context: None,
        }],
    }
}

/// Parse the required device description.
pub fn parse_device_info(raw: &str) -> Result<DeviceInfo, CoreError> {
    serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("Invalid deviceInfo JSON: {e}")))
}

/// Parse the optional user description; blank input means "no user info".
pub fn parse_user_info(raw: &str) -> Result<Option<UserInfo>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| CoreError::Validation(format!("Invalid userInfo JSON: {e}")))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
