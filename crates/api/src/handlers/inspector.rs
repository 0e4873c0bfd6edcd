//! Handlers for the HTML report inspector.
//!
//! Same operations as the JSON API in [`super::reports`], rendered as HTML
//! pages for people triaging reports in a browser.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;
use crate::handlers::reports::load_sorted_reports;
use crate::render;
use crate::state::AppState;

/// An [`AppError`] rendered as an HTML error page with the same status.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let (status, _code, message) = self.0.classify();
        (status, Html(render::error_page(status, &message))).into_response()
    }
}

/// GET / -- list every stored report, most recent first.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, HtmlError> {
    let reports = load_sorted_reports(&state).await?;
    Ok(Html(render::index_page(&reports)))
}

/// GET /reports/{id} -- show one report.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, HtmlError> {
    let report = state
        .store()?
        .get(&id)
        .await
        .map_err(AppError::from)?;
    Ok(Html(render::detail_page(&report)))
}
