//! Outbound events for the bug report service.
//!
//! Currently a single sink: [`LogForwarder`], which posts a summary of each
//! accepted report to the log ingestion service.

pub mod forward;

pub use forward::{ForwardError, IngestEntry, LogForwarder};
