use std::fmt;

use axum::http::HeaderValue;
use bug_report_events::forward::DEFAULT_INGEST_URL;

/// Default storage container name.
pub const DEFAULT_CONTAINER_NAME: &str = "bug-reports";

/// Default multipart body limit (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// Built once at startup and shared through `AppState`; request handlers
/// never read the environment themselves.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes (default: 32 MiB).
    pub max_upload_bytes: usize,
    /// Blob storage connection string. `None` runs the service in
    /// log-only mode.
    pub storage_connection_string: Option<String>,
    /// Blob container holding the reports (default: `bug-reports`).
    pub container_name: String,
    /// Log ingestion API key. `None` disables forwarding.
    pub logward_api_key: Option<String>,
    /// Log ingestion endpoint.
    pub logward_ingest_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `8080`                  |
    /// | `CORS_ORIGINS`              | `*`                     |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `MAX_UPLOAD_BYTES`          | `33554432`              |
    /// | `STORAGE_CONNECTION_STRING` | unset (log-only mode)   |
    /// | `STORAGE_CONTAINER_NAME`    | `bug-reports`           |
    /// | `LOGWARD_API_KEY`           | unset (no forwarding)   |
    /// | `LOGWARD_INGEST_URL`        | LogWard ingest endpoint |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_origins.iter().filter(|o| o.as_str() != "*") {
            HeaderValue::from_str(origin).map_err(|e| ConfigError {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_var("PORT", get("PORT"), 8080)?,
            cors_origins,
            request_timeout_secs: parse_var(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                30,
            )?,
            max_upload_bytes: parse_var(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            storage_connection_string: get("STORAGE_CONNECTION_STRING"),
            container_name: get("STORAGE_CONTAINER_NAME")
                .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.into()),
            logward_api_key: get("LOGWARD_API_KEY"),
            logward_ingest_url: get("LOGWARD_INGEST_URL")
                .unwrap_or_else(|| DEFAULT_INGEST_URL.into()),
        })
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

// Credentials are redacted.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field(
                "storage_connection_string",
                &self.storage_connection_string.as_ref().map(|_| "<redacted>"),
            )
            .field("container_name", &self.container_name)
            .field(
                "logward_api_key",
                &self.logward_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("logward_ingest_url", &self.logward_ingest_url)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
