use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bug_report_core::error::CoreError;
use bug_report_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`StorageError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bug_report_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A read from the report store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Writing a report to the store failed.
    #[error("Failed to persist report: {0}")]
    Persistence(StorageError),

    /// No storage backend is configured.
    #[error("Report storage is not configured")]
    StorageUnavailable,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    ///
    /// Internal details are logged here and replaced with a generic message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Storage errors ---
            AppError::Storage(StorageError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Report not found".to_string(),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                internal()
            }
            AppError::Persistence(err) => {
                tracing::error!(error = %err, "Failed to persist report");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "Failed to save report".to_string(),
                )
            }
            AppError::StorageUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Report storage is not configured".to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
