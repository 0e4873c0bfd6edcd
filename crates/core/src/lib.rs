//! Domain types and request-intake rules for the bug report service.
//!
//! Nothing in this crate performs I/O: the storage and HTTP layers build on
//! the [`report::BugReport`] model and the parsing helpers in [`intake`].

pub mod error;
pub mod intake;
pub mod report;
pub mod types;
