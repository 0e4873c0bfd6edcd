use async_trait::async_trait;

use crate::error::StorageError;

/// Raw blob operations against a single container.
///
/// Keys are `/`-separated paths relative to the container root.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Create the container if it does not exist yet. Idempotent.
    async fn ensure_container(&self) -> Result<(), StorageError>;

    /// Write `data` under `key`, replacing any existing blob.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Read the blob at `key`; [`StorageError::NotFound`] when absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Every key in the container.
    async fn list_keys(&self) -> Result<Vec<String>, StorageError>;

    /// Public URL at which the blob under `key` is served.
    fn blob_url(&self, key: &str) -> String;
}
