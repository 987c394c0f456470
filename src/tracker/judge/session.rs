extern crate async_trait;
extern crate reqwest;
extern crate serde_json;

use super::{
    error::{network_error, TransportError},
    remote::Remote,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Proxy, Response};
use serde_json::Value;

const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";

/// HTTP session with the judge, keeping cookies between calls.
pub struct Session {
    client: Client,
}
impl Session {
    fn from_builder(builder: ClientBuilder) -> Result<Self, TransportError> {
        Ok(Session {
            client: builder
                .user_agent(FIREFOX_UA)
                .cookie_store(true)
                .build()
                .map_err(TransportError::Builder)?,
        })
    }
    pub fn new() -> Result<Self, TransportError> {
        Self::from_builder(Client::builder())
    }
    pub fn with_proxy(proxy: Option<String>) -> Result<Self, TransportError> {
        match proxy {
            Some(p) => Self::from_builder(
                Client::builder().proxy(Proxy::https(p).map_err(TransportError::Builder)?),
            ),
            None => Self::new(),
        }
    }
}

async fn read_body(response: Response) -> Result<Option<Value>, TransportError> {
    let body = response
        .error_for_status()
        .map_err(network_error)?
        .bytes()
        .await
        .map_err(network_error)?;
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| TransportError::Other(format!("Invalid json body: {}", e)))
}

#[async_trait]
impl Remote for Session {
    async fn get_json(&self, url: &str) -> Result<Option<Value>, TransportError> {
        read_body(self.client.get(url).send().await.map_err(network_error)?).await
    }
    async fn post_json(&self, url: &str, body: &Value) -> Result<Option<Value>, TransportError> {
        read_body(
            self.client
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(network_error)?,
        )
        .await
    }
}
