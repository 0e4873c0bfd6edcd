use axum::routing::get;
use axum::Router;

use crate::handlers::inspector;
use crate::state::AppState;

/// HTML inspector routes (root level).
///
/// ```text
/// GET    /                  -> index
/// GET    /reports/{id}      -> detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inspector::index))
        .route("/reports/{id}", get(inspector::detail))
}
