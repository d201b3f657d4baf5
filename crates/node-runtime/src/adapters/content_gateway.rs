//! # Content Gateway
//!
//! HTTP adapter over the content daemon's API, implementing the ledger's
//! [`ContentStore`] port. The daemon searches the network for unknown
//! hashes instead of answering "not found", so every call carries a
//! bounded timeout and a timeout is surfaced as its own error rather
//! than as absence.

use async_trait::async_trait;
use ledger_app::{ContentStore, ContentStoreError};
use shared_crypto::Address;
use std::time::Duration;
use tracing::debug;

/// Per-request timeout for existence probes and list fetches.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// [`ContentStore`] backed by a content daemon's HTTP API.
pub struct HttpContentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentGateway {
    /// Build a gateway against the daemon at `base_url`
    /// (e.g. `http://127.0.0.1:5001`).
    pub fn new(base_url: &str) -> Result<Self, ContentStoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ContentStoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn block_api(&self, verb: &str, hash: &str) -> Result<reqwest::Response, ContentStoreError> {
        let url = format!("{}/api/v0/block/{verb}?arg={hash}", self.base_url);
        self.client.post(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ContentStoreError::Timeout
            } else {
                ContentStoreError::Request(e.to_string())
            }
        })
    }

    /// Fetch and decode the authorized-address list stored under `hash`.
    ///
    /// The stored object must be a JSON array of address strings. Called
    /// once at startup; any failure is fatal there.
    pub async fn fetch_authorized_list(&self, hash: &str) -> Result<Vec<Address>, ContentStoreError> {
        let response = self.block_api("get", hash).await?;
        if !response.status().is_success() {
            return Err(ContentStoreError::Request(format!(
                "the daemon answered {} for {hash}",
                response.status()
            )));
        }
        let raw = response
            .bytes()
            .await
            .map_err(|e| ContentStoreError::Request(e.to_string()))?;
        let list: Vec<String> = serde_json::from_slice(&raw).map_err(|_| {
            ContentStoreError::Request(format!("the object {hash} is not a JSON list of addresses"))
        })?;
        list.iter()
            .map(|s| {
                Address::parse(s).map_err(|e| {
                    ContentStoreError::Request(format!("bad address in authorized list: {e}"))
                })
            })
            .collect()
    }
}

#[async_trait]
impl ContentStore for HttpContentGateway {
    async fn exists(&self, hash: &str) -> Result<bool, ContentStoreError> {
        let response = self.block_api("stat", hash).await?;
        debug!(hash, status = %response.status(), "content existence probe");
        Ok(response.status().is_success())
    }
}
