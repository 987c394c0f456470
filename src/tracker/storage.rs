//! Flat key/value storage tiers.
//!
//! Problem records and configuration share one namespace per tier; callers
//! tell them apart by key.

extern crate async_trait;
extern crate serde_json;

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

pub type Snapshot = BTreeMap<String, Value>;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn get_all(&self) -> Result<Snapshot, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}
