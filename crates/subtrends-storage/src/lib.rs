//! # subtrends-storage
//!
//! Parquet encoding and storage backends for subtrends. A scraped batch is
//! encoded to a Parquet buffer once and handed to whichever
//! [`ObjectStore`] backend is selected — local filesystem or an
//! S3-compatible object store.

pub mod backends;
pub mod encode;

use tracing::info;

use subtrends_core::result::AppResult;
use subtrends_core::traits::object_store::ObjectStore;
use subtrends_core::types::ScrapeBatch;

/// Encode a batch and persist it at its derived object key.
///
/// Returns the key the batch was stored under.
pub async fn save_batch(store: &dyn ObjectStore, batch: &ScrapeBatch) -> AppResult<String> {
    let data = encode::encode_batch(batch)?;
    let key = batch.object_key();
    let bytes = data.len();

    store.put(&key, data).await?;
    info!(%key, bytes, backend = store.backend_type(), "Saved batch");
    Ok(key)
}
