extern crate async_trait;
extern crate serde_json;

use super::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// A single request/response exchange with the judge.
///
/// `Ok(None)` means the call succeeded but carried no body.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Option<Value>, TransportError>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<Option<Value>, TransportError>;
}
