//! S3-compatible storage backend (MinIO, AWS S3).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use subtrends_core::config::storage::S3StorageConfig;
use subtrends_core::error::AppError;
use subtrends_core::result::AppResult;
use subtrends_core::traits::object_store::{ObjectStore, StoredObject};

/// S3-compatible object store.
///
/// MinIO needs both a custom `endpoint` and path-style addressing, which
/// is why `force_path_style` defaults to on.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 store from configuration.
    pub fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        if config.access_key.is_empty() || config.secret_key.is_empty() {
            return Err(AppError::configuration(
                "storage.s3.access_key and storage.s3.secret_key must be set",
            ));
        }

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "subtrends-config",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        debug!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 store"
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }

    /// Create the configured bucket if it does not exist yet.
    pub async fn ensure_bucket(&self) -> AppResult<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                debug!(bucket = %self.bucket, "Bucket exists");
                Ok(())
            }
            Err(SdkError::ServiceError(_)) => {
                self.client
                    .create_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await
                    .map_err(|e| {
                        AppError::storage(format!(
                            "Failed to create bucket {}: {e}",
                            self.bucket
                        ))
                    })?;
                info!(bucket = %self.bucket, "Created bucket");
                Ok(())
            }
            Err(e) => Err(AppError::storage(format!(
                "Bucket check for {} failed: {e}",
                self.bucket
            ))),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn backend_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(_)) => Ok(false),
            Err(e) => Err(AppError::storage(format!("S3 health check failed: {e}"))),
        }
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        let bytes = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/octet-stream")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Failed to upload {key}: {e}")))?;

        debug!(key, bytes, "Uploaded object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_not_found() => Ok(false),
            Err(e) => Err(AppError::storage(format!(
                "Failed to check object {key}: {e}"
            ))),
        }
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| AppError::storage(format!("Failed to list objects: {e}")))?;
            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let last_modified = object
                    .last_modified()
                    .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos()));

                objects.push(StoredObject {
                    key: key.to_string(),
                    size_bytes: object.size().unwrap_or(0).max(0) as u64,
                    last_modified,
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}
