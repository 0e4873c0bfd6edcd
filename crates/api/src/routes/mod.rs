pub mod health;
pub mod inspector;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reports                  submit (POST), list (GET)
/// /reports/{id}             get (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/reports", reports::router())
}
