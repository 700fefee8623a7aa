//! Local filesystem storage backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use subtrends_core::error::{AppError, ErrorKind};
use subtrends_core::result::AppResult;
use subtrends_core::traits::object_store::{ObjectStore, StoredObject};

/// Local filesystem object store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored batches.
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to an absolute path within the root.
    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Key of a stored file relative to the root, with `/` separators.
    fn key_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn backend_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.resolve(key).exists())
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to list directory: {}", dir.display()),
                        e,
                    ));
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let meta = entry.metadata().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
                })?;

                if meta.is_dir() {
                    pending.push(entry.path());
                    continue;
                }

                let Some(key) = self.key_for(&entry.path()) else {
                    continue;
                };
                if !key.starts_with(prefix) || !key.ends_with(".parquet") {
                    continue;
                }

                let last_modified = meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from);

                objects.push(StoredObject {
                    key,
                    size_bytes: meta.len(),
                    last_modified,
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let key = "rust/top/top_week_20260829_120000.parquet";
        store.put(key, Bytes::from("data")).await.unwrap();

        assert!(store.exists(key).await.unwrap());
        assert!(dir.path().join("rust/top").is_dir());
    }

    #[tokio::test]
    async fn list_filters_by_prefix_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store
            .put("rust/top/a.parquet", Bytes::from("a"))
            .await
            .unwrap();
        store
            .put("rust/hot/b.parquet", Bytes::from("b"))
            .await
            .unwrap();
        store
            .put("golang/top/c.parquet", Bytes::from("c"))
            .await
            .unwrap();
        store.put("rust/top/notes.txt", Bytes::from("x")).await.unwrap();

        let all = store.list("").await.unwrap();
        assert_eq!(all.len(), 3);

        let rust_only = store.list("rust/").await.unwrap();
        let keys: Vec<_> = rust_only.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["rust/hot/b.parquet", "rust/top/a.parquet"]);
    }

    #[tokio::test]
    async fn health_check_reports_root_presence() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        assert!(store.health_check().await.unwrap());
    }
}
