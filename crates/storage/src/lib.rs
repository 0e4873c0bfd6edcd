//! Blob-backed persistence for bug reports.
//!
//! [`ReportStore`] owns the storage layout (one namespace per report id)
//! and delegates raw blob I/O to a [`BlobBackend`]. Two backends exist:
//! [`S3Backend`] for any S3-compatible service and [`MemoryBackend`] for
//! tests and local development.

pub mod backend;
pub mod connection;
pub mod error;
pub mod memory;
pub mod s3;
pub mod store;

pub use backend::BlobBackend;
pub use connection::ConnectionString;
pub use error::StorageError;
pub use memory::MemoryBackend;
pub use s3::S3Backend;
pub use store::ReportStore;
