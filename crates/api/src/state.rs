use std::sync::Arc;
use std::time::Duration;

use bug_report_events::LogForwarder;
use bug_report_storage::{ConnectionString, ReportStore, S3Backend};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Upper bound on the startup container check.
const ENSURE_CONTAINER_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Report store; `None` when no storage backend is configured.
    pub store: Option<ReportStore>,
    /// Log ingestion forwarder; `None` when no API key is configured.
    pub forwarder: Option<Arc<LogForwarder>>,
}

impl AppState {
    /// Wire up the optional collaborators named by `config`.
    ///
    /// Neither a bad storage connection string nor an unreachable backend
    /// stops the service: it falls back to log-only mode or carries on and
    /// lets individual requests fail.
    pub async fn initialize(config: ServerConfig) -> Self {
        let store = match &config.storage_connection_string {
            Some(raw) => connect_store(raw, &config.container_name).await,
            None => {
                tracing::warn!(
                    "STORAGE_CONNECTION_STRING not set, reports will be logged only (no persistence)"
                );
                None
            }
        };

        let forwarder = match &config.logward_api_key {
            Some(key) => match LogForwarder::new(config.logward_ingest_url.clone(), key.clone()) {
                Ok(forwarder) => Some(Arc::new(forwarder)),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build log forwarder, forwarding disabled");
                    None
                }
            },
            None => None,
        };

        tracing::info!(
            container = %config.container_name,
            persistence = store.is_some(),
            forwarding = forwarder.is_some(),
            "Application state initialized",
        );

        Self {
            config: Arc::new(config),
            store,
            forwarder,
        }
    }

    /// The configured report store, or [`AppError::StorageUnavailable`].
    pub fn store(&self) -> AppResult<&ReportStore> {
        self.store.as_ref().ok_or(AppError::StorageUnavailable)
    }
}

async fn connect_store(raw: &str, container: &str) -> Option<ReportStore> {
    let conn = match ConnectionString::parse(raw) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to initialize storage, reports will be logged only");
            return None;
        }
    };

    let backend = S3Backend::connect(&conn, container).await;
    let store = ReportStore::new(Arc::new(backend));

    match tokio::time::timeout(ENSURE_CONTAINER_TIMEOUT, store.ensure_container()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, container, "Failed to ensure storage container exists");
        }
        Err(_) => {
            tracing::warn!(container, "Timed out ensuring storage container exists");
        }
    }

    Some(store)
}
