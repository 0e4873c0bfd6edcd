//! Handlers for the bug report JSON API.
//!
//! Submission is the only write path: it validates the multipart form,
//! uploads the optional screenshot, persists the report and forwards a
//! summary to the log ingestion service. Only the metadata write can fail
//! the request; the screenshot upload and the forward are best-effort.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use bug_report_core::intake::{ReportSubmission, FIELD_SCREENSHOT};
use bug_report_core::report::{sort_newest_first, BugReport};

use crate::error::{AppError, AppResult};
use crate::response::{ListResponse, SubmitResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/reports
// ---------------------------------------------------------------------------

/// Submit a new bug report as a multipart form.
pub async fn submit_report(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<SubmitResponse>> {
    let multipart = multipart
        .map_err(|e| AppError::BadRequest(format!("Failed to parse multipart form: {e}")))?;
    let (submission, screenshot) = read_submission(multipart).await?;

    let mut report = submission.into_report(chrono::Utc::now())?;

    if let (Some(store), Some(data)) = (&state.store, screenshot) {
        match store.save_screenshot(&report.id, data).await {
            Ok(url) => report.screenshot_url = Some(url),
            Err(e) => {
                tracing::warn!(report_id = %report.id, error = %e, "Failed to upload screenshot");
            }
        }
    }

    match &state.store {
        Some(store) => store.save(&report).await.map_err(AppError::Persistence)?,
        None => log_unpersisted(&report)?,
    }

    if let Some(forwarder) = &state.forwarder {
        if let Err(e) = forwarder.forward_report(&report).await {
            tracing::warn!(report_id = %report.id, error = %e, "Failed to forward bug report");
        }
    }

    tracing::info!(
        report_id = %report.id,
        route = %report.current_route,
        platform = %report.device_info.platform,
        has_screenshot = report.has_screenshot(),
        "Bug report submitted",
    );

    Ok(Json(SubmitResponse::accepted(report.id)))
}

/// Drain the multipart stream into text fields and an optional screenshot.
///
/// Only a file part named `screenshot` counts as a screenshot; a plain
/// text field with that name is ignored. An unreadable screenshot part is
/// dropped rather than failing the request, and an empty one counts as
/// absent.
async fn read_submission(
    mut multipart: Multipart,
) -> AppResult<(ReportSubmission, Option<Vec<u8>>)> {
    let mut submission = ReportSubmission::default();
    let mut screenshot = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to parse multipart form: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FIELD_SCREENSHOT {
            if field.file_name().is_none() {
                tracing::debug!("Ignoring screenshot field without a file name");
                continue;
            }
            match field.bytes().await {
                Ok(data) if !data.is_empty() => screenshot = Some(data.to_vec()),
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "Ignoring unreadable screenshot part"),
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
        if !submission.set_field(&name, value) {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok((submission, screenshot))
}

/// Without a store the report only survives in the log stream.
fn log_unpersisted(report: &BugReport) -> AppResult<()> {
    let json = serde_json::to_string(report)
        .map_err(|e| AppError::InternalError(format!("Failed to encode report: {e}")))?;
    tracing::info!(report_id = %report.id, report = %json, "Bug report received (no storage)");
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /api/reports
// ---------------------------------------------------------------------------

/// List every stored report, most recent first.
pub async fn list_reports(State(state): State<AppState>) -> AppResult<Json<ListResponse>> {
    let reports = load_sorted_reports(&state).await?;
    Ok(Json(ListResponse::new(reports)))
}

/// Fetch all reports and order them for display.
pub(crate) async fn load_sorted_reports(state: &AppState) -> AppResult<Vec<BugReport>> {
    let mut reports = state.store()?.list().await?;
    sort_newest_first(&mut reports);
    Ok(reports)
}

// ---------------------------------------------------------------------------
// GET /api/reports/{id}
// ---------------------------------------------------------------------------

/// Get a single report by id.
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BugReport>> {
    let report = state.store()?.get(&id).await?;
    Ok(Json(report))
}
