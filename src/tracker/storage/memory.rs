extern crate async_trait;
extern crate tokio;

use super::{KeyValueStore, Snapshot, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// Process-local tier. Lost whenever the process stops.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<Snapshot>,
}
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.map.lock().await.get(key).cloned())
    }
    async fn get_all(&self) -> Result<Snapshot, StoreError> {
        Ok(self.map.lock().await.clone())
    }
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.map.lock().await.insert(key.to_string(), value);
        Ok(())
    }
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.lock().await.remove(key);
        Ok(())
    }
    async fn clear(&self) -> Result<(), StoreError> {
        self.map.lock().await.clear();
        Ok(())
    }
}
