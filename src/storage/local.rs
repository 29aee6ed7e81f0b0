//! Local filesystem storage implementation.
//!
//! Stands in for the record table and the media bucket during development
//! and tests. Production deployments use the AWS backends.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml             # Ingest configuration
//! ├── items/
//! │   └── {source}.json       # Records keyed by CreatedAt
//! └── objects/
//!     └── {bucket}/
//!         └── {key}           # Uploaded media
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::NormalizedItem;
use crate::storage::{ItemStore, ObjectStore, PutObject};

/// Records of one source, ordered by `CreatedAt`.
type SourceItems = BTreeMap<i64, NormalizedItem>;

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    bucket: String,
    // Serializes read-modify-write of the per-source item files.
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            bucket: bucket.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Path where an uploaded object lands.
    pub fn object_path(&self, key: &str) -> PathBuf {
        self.path(&format!("objects/{}/{}", self.bucket, key.trim_start_matches('/')))
    }

    fn items_key(source: &str) -> String {
        format!("items/{source}.json")
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_path(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_path(&self.path(key), &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All stored records of a source, newest first.
    pub async fn load_items(&self, source: &str) -> Result<Vec<NormalizedItem>> {
        let items: SourceItems = self
            .read_json(&Self::items_key(source))
            .await?
            .unwrap_or_default();
        Ok(items.into_values().rev().collect())
    }
}

#[async_trait]
impl ItemStore for LocalStorage {
    async fn latest_created_at(&self, source: &str) -> Result<Option<i64>> {
        let items: Option<SourceItems> = self.read_json(&Self::items_key(source)).await?;
        Ok(items.and_then(|items| items.keys().next_back().copied()))
    }

    async fn put_item(&self, item: &NormalizedItem) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let key = Self::items_key(&item.source);
        let mut items: SourceItems = self.read_json(&key).await?.unwrap_or_default();
        if items.insert(item.created_at, item.clone()).is_some() {
            log::debug!(
                "Replaced record {}/{} with item {}",
                item.source,
                item.created_at,
                item.id
            );
        }
        self.write_json(&key, &items).await
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn put_object(&self, object: PutObject) -> Result<()> {
        let path = self.object_path(&object.key);
        self.write_path(&path, &object.body).await?;
        log::debug!(
            "Stored {} bytes ({}) at {}",
            object.body.len(),
            object.content_type.as_deref().unwrap_or("unknown type"),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(id: i64, created_at: i64) -> NormalizedItem {
        NormalizedItem {
            id,
            source: "gobierno".into(),
            created_at,
            title: format!("Noticia {id}"),
            summary: "resumen".into(),
            link: format!("https://example.com/?p={id}"),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_latest_created_at_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "media");

        assert_eq!(storage.latest_created_at("gobierno").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_and_latest() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "media");

        storage.put_item(&item(1, 300)).await.unwrap();
        storage.put_item(&item(2, 100)).await.unwrap();
        storage.put_item(&item(3, 200)).await.unwrap();

        assert_eq!(storage.latest_created_at("gobierno").await.unwrap(), Some(300));
        assert_eq!(storage.latest_created_at("other").await.unwrap(), None);

        let ids: Vec<i64> = storage
            .load_items("gobierno")
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_same_timestamp_overwrites() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "media");

        storage.put_item(&item(1, 500)).await.unwrap();
        storage.put_item(&item(2, 500)).await.unwrap();

        let items = storage.load_items("gobierno").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_not_lost() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "media");

        let writes = (0..16).map(|i| {
            let storage = storage.clone();
            async move { storage.put_item(&item(i, i * 10)).await }
        });
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        assert_eq!(storage.load_items("gobierno").await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_put_object() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path(), "media");

        storage
            .put_object(PutObject {
                key: "media/news/7.png".into(),
                body: b"png".to_vec(),
                content_type: Some("image/png".into()),
                content_length: Some(3),
                public_read: true,
            })
            .await
            .unwrap();

        let written = tokio::fs::read(storage.object_path("media/news/7.png"))
            .await
            .unwrap();
        assert_eq!(written, b"png");
        assert!(tmp.path().join("objects/media/media/news/7.png").exists());
    }
}
