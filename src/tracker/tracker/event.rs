extern crate async_trait;
extern crate serde;
extern crate tokio;

use crate::config::tracker::EVENT_BUFFER;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};

/// A completed request observed in the browser.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkEvent {
    pub url: String,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub timestamp: f64,
}
impl NetworkEvent {
    pub fn new(url: &str, initiator: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            initiator: initiator.map(str::to_string),
            timestamp: 0.0,
        }
    }
}

pub fn channel() -> (mpsc::Sender<NetworkEvent>, mpsc::Receiver<NetworkEvent>) {
    mpsc::channel(EVENT_BUFFER)
}

/// The focused tab the user submitted from.
#[async_trait]
pub trait ActiveTab: Send + Sync {
    async fn active_url(&self) -> Option<String>;
}

/// Active tab fed by whoever watches the browser.
#[derive(Default)]
pub struct SharedTab {
    url: RwLock<Option<String>>,
}
impl SharedTab {
    pub fn new() -> Self {
        Self::default()
    }
    pub async fn set(&self, url: Option<String>) {
        *self.url.write().await = url;
    }
}
#[async_trait]
impl ActiveTab for SharedTab {
    async fn active_url(&self) -> Option<String> {
        self.url.read().await.clone()
    }
}
