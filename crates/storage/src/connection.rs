//! Parsing of the `Key=Value;` storage connection string.
//!
//! ```text
//! AccountName=acme;AccessKeyId=AKIA...;SecretAccessKey=...;EndpointSuffix=r2.cloudflarestorage.com;Region=auto
//! ```
//!
//! | Key               | Required | Default                    |
//! |-------------------|----------|----------------------------|
//! | `AccountName`     | yes      | --                         |
//! | `AccessKeyId`     | yes      | --                         |
//! | `SecretAccessKey` | yes      | --                         |
//! | `EndpointSuffix`  | no       | `r2.cloudflarestorage.com` |
//! | `Region`          | no       | `auto`                     |

use std::fmt;

use crate::error::StorageError;

/// Storage domain used when the connection string does not name one.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "r2.cloudflarestorage.com";

/// Signing region used when the connection string does not name one.
pub const DEFAULT_REGION: &str = "auto";

/// Parsed storage account credentials and location.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_suffix: String,
    pub region: String,
}

impl ConnectionString {
    /// Parse a connection string. Keys are case-insensitive and unknown
    /// keys are ignored.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let mut account_name = None;
        let mut access_key_id = None;
        let mut secret_access_key = None;
        let mut endpoint_suffix = None;
        let mut region = None;

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::InvalidConnectionString(format!("expected Key=Value, got '{pair}'"))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "accountname" => account_name = Some(value),
                "accesskeyid" => access_key_id = Some(value),
                "secretaccesskey" => secret_access_key = Some(value),
                "endpointsuffix" => endpoint_suffix = Some(value),
                "region" => region = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            account_name: required(account_name, "AccountName")?,
            access_key_id: required(access_key_id, "AccessKeyId")?,
            secret_access_key: required(secret_access_key, "SecretAccessKey")?,
            endpoint_suffix: endpoint_suffix
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_string()),
            region: region
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    /// Service endpoint, `https://<account>.<suffix>`.
    pub fn endpoint(&self) -> String {
        format!("https://{}.{}", self.account_name, self.endpoint_suffix)
    }
}

fn required(value: Option<String>, key: &str) -> Result<String, StorageError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StorageError::InvalidConnectionString(format!("missing {key}")))
}

// The secret must never reach the logs.
impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("account_name", &self.account_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("region", &self.region)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
