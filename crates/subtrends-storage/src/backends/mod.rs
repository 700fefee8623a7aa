//! Storage backend implementations.

pub mod local;
pub mod s3;

use std::sync::Arc;

use subtrends_core::config::storage::{BackendKind, StorageConfig};
use subtrends_core::result::AppResult;
use subtrends_core::traits::object_store::ObjectStore;

/// Build the object store selected by `kind` from configuration.
///
/// For S3 this also makes sure the configured bucket exists.
pub async fn build_store(
    config: &StorageConfig,
    kind: BackendKind,
) -> AppResult<Arc<dyn ObjectStore>> {
    match kind {
        BackendKind::Local => {
            let store = local::LocalObjectStore::new(&config.local.root_path).await?;
            Ok(Arc::new(store))
        }
        BackendKind::S3 => {
            let store = s3::S3ObjectStore::new(&config.s3)?;
            store.ensure_bucket().await?;
            Ok(Arc::new(store))
        }
    }
}
