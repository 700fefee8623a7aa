//! Object-store trait for pluggable batch storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Key within the store.
    pub key: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp, if the backend reports one.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Trait for batch storage backends.
///
/// Implementations exist for the local filesystem and S3-compatible object
/// stores (MinIO). The trait is defined here in `subtrends-core` and
/// implemented in `subtrends-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "s3").
    fn backend_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object at the given key, creating any missing hierarchy.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Check whether an object exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// List stored objects under the given key prefix.
    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>>;
}
