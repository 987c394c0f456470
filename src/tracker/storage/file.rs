extern crate async_trait;
extern crate serde_json;
extern crate tokio;

use super::{KeyValueStore, Snapshot, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::{io::ErrorKind, path::PathBuf};
use tokio::{fs, sync::Mutex};

/// Tier backed by one JSON document on disk.
///
/// Every mutation rewrites the whole document through a temporary file and a
/// rename, so a reader never sees a half-written map.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}
impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
    async fn load(&self) -> Result<Snapshot, StoreError> {
        match fs::read(&self.path).await {
            Ok(data) if data.iter().all(|b| b.is_ascii_whitespace()) => Ok(Snapshot::new()),
            Ok(data) => {
                serde_json::from_slice(&data).map_err(|e| StoreError::Json(self.path.clone(), e))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::new()),
            Err(e) => Err(StoreError::Io(self.path.clone(), e)),
        }
    }
    async fn save(&self, map: &Snapshot) -> Result<(), StoreError> {
        let data =
            serde_json::to_vec_pretty(map).map_err(|e| StoreError::Json(self.path.clone(), e))?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StoreError::Io(dir.to_path_buf(), e))?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data)
            .await
            .map_err(|e| StoreError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(self.path.clone(), e))
    }
    async fn update<F: FnOnce(&mut Snapshot) + Send>(&self, fun: F) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.load().await?;
        fun(&mut map);
        self.save(&map).await
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }
    async fn get_all(&self) -> Result<Snapshot, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let key = key.to_string();
        self.update(move |map| {
            map.insert(key, value);
        })
        .await
    }
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.remove(key);
        })
        .await
    }
    async fn clear(&self) -> Result<(), StoreError> {
        self.update(|map| map.clear()).await
    }
}
