use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::BlobBackend;
use crate::error::StorageError;

/// Base URL reported for blobs held in memory.
const MEMORY_BASE_URL: &str = "memory://";

/// In-process blob backend.
///
/// Keys can be marked as failing to simulate backend outages on writes.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    container: String,
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
    failing_keys: RwLock<HashSet<String>>,
}

impl MemoryBackend {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Default::default()
        }
    }

    /// Make every subsequent `put` to a key ending in `suffix` fail.
    pub async fn fail_writes_ending_with(&self, suffix: impl Into<String>) {
        self.failing_keys.write().await.insert(suffix.into());
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Raw bytes under `key`, if any.
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobBackend for MemoryBackend {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        let failing = self.failing_keys.read().await;
        if failing.iter().any(|suffix| key.ends_with(suffix.as_str())) {
            return Err(StorageError::Backend(format!("simulated write failure for {key}")));
        }
        drop(failing);

        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }

    fn blob_url(&self, key: &str) -> String {
        format!("{MEMORY_BASE_URL}{}/{key}", self.container)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
