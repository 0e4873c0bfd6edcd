//! Report persistence on top of a [`BlobBackend`].
//!
//! Every report lives under its own key prefix:
//!
//! ```text
//! <id>/metadata.json    full report, pretty-printed
//! <id>/logs.json        log entries only, pretty-printed
//! <id>/screenshot.png   optional screenshot bytes
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use bug_report_core::report::{is_safe_report_id, BugReport};

use crate::backend::BlobBackend;
use crate::error::StorageError;

pub const METADATA_BLOB: &str = "metadata.json";
pub const LOGS_BLOB: &str = "logs.json";
pub const SCREENSHOT_BLOB: &str = "screenshot.png";

const JSON_CONTENT_TYPE: &str = "application/json";
const PNG_CONTENT_TYPE: &str = "image/png";

/// Key of a blob inside a report's namespace.
pub fn blob_key(report_id: &str, blob: &str) -> String {
    format!("{report_id}/{blob}")
}

/// Save/get/list of bug reports keyed by report id.
#[derive(Clone)]
pub struct ReportStore {
    backend: Arc<dyn BlobBackend>,
}

impl ReportStore {
    pub fn new(backend: Arc<dyn BlobBackend>) -> Self {
        Self { backend }
    }

    /// Create the backing container if needed.
    pub async fn ensure_container(&self) -> Result<(), StorageError> {
        self.backend.ensure_container().await
    }

    /// Write the report metadata and its log entries as two blobs.
    ///
    /// Fails if either write fails. A failed log write can leave the
    /// metadata blob behind; the caller still sees an error.
    pub async fn save(&self, report: &BugReport) -> Result<(), StorageError> {
        let metadata_key = blob_key(&report.id, METADATA_BLOB);
        let metadata = serde_json::to_vec_pretty(report).map_err(|source| StorageError::Encode {
            key: metadata_key.clone(),
            source,
        })?;

        let logs_key = blob_key(&report.id, LOGS_BLOB);
        let logs = serde_json::to_vec_pretty(&report.logs).map_err(|source| StorageError::Encode {
            key: logs_key.clone(),
            source,
        })?;

        self.backend
            .put(&metadata_key, metadata, JSON_CONTENT_TYPE)
            .await?;
        self.backend.put(&logs_key, logs, JSON_CONTENT_TYPE).await?;

        tracing::debug!(report_id = %report.id, "Saved bug report blobs");
        Ok(())
    }

    /// Upload screenshot bytes and return the URL they are served from.
    pub async fn save_screenshot(
        &self,
        report_id: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = blob_key(report_id, SCREENSHOT_BLOB);
        self.backend.put(&key, data, PNG_CONTENT_TYPE).await?;
        Ok(self.backend.blob_url(&key))
    }

    /// Fetch and decode one report.
    pub async fn get(&self, report_id: &str) -> Result<BugReport, StorageError> {
        if !is_safe_report_id(report_id) {
            return Err(StorageError::NotFound(report_id.to_string()));
        }

        let key = blob_key(report_id, METADATA_BLOB);
        let data = self.backend.get(&key).await?;
        serde_json::from_slice(&data).map_err(|source| StorageError::Decode { key, source })
    }

    /// Fetch every stored report, in no particular order.
    ///
    /// A report that cannot be fetched or decoded is logged and skipped.
    pub async fn list(&self) -> Result<Vec<BugReport>, StorageError> {
        let suffix = format!("/{METADATA_BLOB}");
        let report_ids: BTreeSet<String> = self
            .backend
            .list_keys()
            .await?
            .into_iter()
            .filter_map(|key| key.strip_suffix(&suffix).map(str::to_string))
            .collect();

        let mut reports = Vec::with_capacity(report_ids.len());
        for report_id in report_ids {
            match self.get(&report_id).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::warn!(report_id = %report_id, error = %e, "Skipping unreadable bug report");
                }
            }
        }
        Ok(reports)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
