//! Response envelopes for the JSON API.
//!
//! Success responses carry `"success": true`; error responses are produced
//! by [`AppError`](crate::error::AppError) with `"success": false`.

use bug_report_core::report::BugReport;
use bug_report_core::types::ReportId;
use serde::Serialize;

/// Body of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub report_id: ReportId,
}

impl SubmitResponse {
    pub fn accepted(report_id: ReportId) -> Self {
        Self {
            success: true,
            report_id,
        }
    }
}

/// Body of the report listing.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub reports: Vec<BugReport>,
    pub count: usize,
}

impl ListResponse {
    pub fn new(reports: Vec<BugReport>) -> Self {
        Self {
            success: true,
            count: reports.len(),
            reports,
        }
    }
}
