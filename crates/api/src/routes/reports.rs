//! Route definitions for the bug report JSON API.
//!
//! Mounted at `/reports` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Bug report routes.
///
/// ```text
/// POST   /                  -> submit_report
/// GET    /                  -> list_reports
/// GET    /{id}              -> get_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::submit_report))
        .route("/{id}", get(reports::get_report))
}
