//! The persisted bug report model.
//!
//! A [`BugReport`] is created once at intake, written once to storage and
//! only read afterwards. Field names serialize in camelCase to match what
//! client applications submit and what the storage layer writes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{ReportId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix shared by every generated report identifier.
pub const REPORT_ID_PREFIX: &str = "br_";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A submitted bug report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    pub id: ReportId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_to_reproduce: Option<String>,
    pub current_route: String,
    /// Routes in the order the user visited them.
    #[serde(default)]
    pub navigation_history: Vec<String>,
    /// Log lines in the order the client supplied them.
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    pub device_info: DeviceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_url: Option<String>,
}

/// A single client-side log line.
///
/// Every field is lenient on input: clients on constrained platforms often
/// omit `timestamp` or `level`, and a missing field must not turn a
/// structured log array into the raw-text fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

/// Device and application build the report was submitted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform: String,
    pub os: String,
    pub os_version: String,
    pub app_version: String,
    pub build_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

/// Optional identity of the submitting user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Generate a fresh report identifier (`br_` followed by a v4 UUID).
pub fn generate_report_id() -> ReportId {
    format!("{REPORT_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

/// Whether `id` is safe to use as a storage namespace.
///
/// Identifiers come straight from request paths, so anything that could
/// escape the report's own blob prefix is rejected.
pub fn is_safe_report_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && !id.contains('\\') && !id.contains("..")
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// Sort reports so the most recently submitted comes first.
pub fn sort_newest_first(reports: &mut [BugReport]) {
    reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

impl BugReport {
    /// Whether a screenshot was uploaded for this report.
    pub fn has_screenshot(&self) -> bool {
        self.screenshot_url.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
