//! S3-compatible blob backend.
//!
//! Talks path-style to `https://<account>.<endpoint-suffix>` with the static
//! credentials of a [`ConnectionString`], which covers Cloudflare R2, MinIO
//! and other S3-compatible object stores.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::backend::BlobBackend;
use crate::connection::ConnectionString;
use crate::error::StorageError;

/// Provider name attached to the static credentials.
const CREDENTIALS_PROVIDER: &str = "bug-report-connection-string";

/// HTTP status returned by S3-compatible services for missing objects.
const HTTP_NOT_FOUND: u16 = 404;

/// Blob backend over a single S3 bucket.
pub struct S3Backend {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3Backend {
    /// Build a client for `bucket` from a parsed connection string.
    ///
    /// No network traffic happens here; the first request validates the
    /// credentials.
    pub async fn connect(conn: &ConnectionString, bucket: impl Into<String>) -> Self {
        let credentials = Credentials::new(
            conn.access_key_id.clone(),
            conn.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(conn.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(conn.endpoint())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: bucket.into(),
            endpoint: conn.endpoint(),
        }
    }
}

#[async_trait]
impl BlobBackend for S3Backend {
    async fn ensure_container(&self) -> Result<(), StorageError> {
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, "Created storage container");
                Ok(())
            }
            Err(err) => {
                let exists = err.as_service_error().is_some_and(|e| {
                    e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists()
                });
                if exists {
                    tracing::debug!(bucket = %self.bucket, "Storage container already exists");
                    Ok(())
                } else {
                    Err(StorageError::Backend(format!(
                        "failed to create container {}: {}",
                        self.bucket,
                        DisplayErrorContext(&err)
                    )))
                }
            }
        }
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| {
                StorageError::Backend(format!("failed to upload {key}: {}", DisplayErrorContext(&err)))
            })?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err.as_service_error().is_some_and(|e| e.is_no_such_key())
                    || err
                        .raw_response()
                        .is_some_and(|r| r.status().as_u16() == HTTP_NOT_FOUND);
                return Err(if missing {
                    StorageError::NotFound(key.to_string())
                } else {
                    StorageError::Backend(format!(
                        "failed to download {key}: {}",
                        DisplayErrorContext(&err)
                    ))
                });
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to read {key}: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                StorageError::Backend(format!(
                    "failed to list container {}: {}",
                    self.bucket,
                    DisplayErrorContext(&err)
                ))
            })?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }

    fn blob_url(&self, key: &str) -> String {
        format!("{}/{}/{key}", self.endpoint, self.bucket)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
