/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Report identifiers are opaque strings of the form `br_<token>`.
pub type ReportId = String;
