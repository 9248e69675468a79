/**
 * FILESYSTEM STORE - Each location key is a JSON file under a root directory
 *
 * Keys are relative paths; ".." and absolute keys are rejected so a key can
 * never escape the root.
 */

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::Backend(format!("invalid location key: {key:?}")));
        }
        Ok(self.root.join(relative))
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(key, bytes = bytes.len(), "fetched object");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // one temp sibling per write, then rename: readers and concurrent
        // writers only ever see whole blobs
        let tmp = temp_sibling(&path);
        fs::write(&tmp, &bytes).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(key, bytes = bytes.len(), "stored object");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "fs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_key_does_not_exist() {
        let dir = tempdir().unwrap();
        let store = FsRecordStore::new(dir.path());
        assert!(!store.exists("inventory.json").await.unwrap());
        assert!(matches!(store.fetch("inventory.json").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_then_fetch_overwrites() {
        let dir = tempdir().unwrap();
        let store = FsRecordStore::new(dir.path());
        store.store("nested/inventory.json", b"[1]".to_vec()).await.unwrap();
        store.store("nested/inventory.json", b"[2]".to_vec()).await.unwrap();
        assert!(store.exists("nested/inventory.json").await.unwrap());
        assert_eq!(store.fetch("nested/inventory.json").await.unwrap(), b"[2]".to_vec());
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempdir().unwrap();
        let store = FsRecordStore::new(dir.path());
        for key in ["../secret.json", "/etc/passwd", ""] {
            assert!(matches!(store.exists(key).await, Err(StoreError::Backend(_))), "key = {key:?}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_writes_leave_a_whole_blob() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(FsRecordStore::new(dir.path()));

        for round in 0..50 {
            let payloads: Vec<Vec<u8>> =
                (0..8).map(|i| format!("[{}]", format!("{round}-{i}").repeat(512)).into_bytes()).collect();
            let writers: Vec<_> = payloads
                .iter()
                .cloned()
                .map(|bytes| {
                    let store = store.clone();
                    tokio::spawn(async move { store.store("ip-config.json", bytes).await })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }
            let stored = store.fetch("ip-config.json").await.unwrap();
            assert!(payloads.contains(&stored), "round {round}: torn blob");
        }

        // only the object itself is left behind
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ip-config.json"]);
    }

    #[tokio::test]
    async fn test_directory_at_key_is_not_an_object() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("inventory.json")).unwrap();
        let store = FsRecordStore::new(dir.path());
        assert!(!store.exists("inventory.json").await.unwrap());
    }
}
