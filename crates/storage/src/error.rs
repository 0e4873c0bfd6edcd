/// Errors raised by blob backends and the report store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested blob does not exist.
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// A stored blob could not be decoded.
    #[error("Failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend rejected or failed an operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// The configured connection string is unusable.
    #[error("Invalid storage connection string: {0}")]
    InvalidConnectionString(String),
}
