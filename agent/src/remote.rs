//! The remote cart persistence service.

use async_trait::async_trait;
use cart_sync_engine::{Error, PushAck, PushPayload, RemoteCart, RemoteCartEnvelope, Result};
use reqwest::Url;

/// Durable cart records, one per customer.
#[async_trait]
pub trait RemoteCartStore: Send + Sync {
    /// Store the customer's cart. The acknowledgement carries the new
    /// `addedDate`.
    async fn push(&self, payload: &PushPayload) -> Result<PushAck>;

    /// Fetch the saved cart for an email, `None` if there is none.
    async fn fetch(&self, email: &str) -> Result<Option<RemoteCart>>;
}

/// Remote cart service over HTTP.
///
/// Push is `POST {base}`, pull is `GET {base}/email/{email}`.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base: Url,
}

impl HttpRemoteStore {
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    fn pull_url(&self, email: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::RemoteFetch(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .push("email")
            .push(email);
        Ok(url)
    }
}

#[async_trait]
impl RemoteCartStore for HttpRemoteStore {
    async fn push(&self, payload: &PushPayload) -> Result<PushAck> {
        let response = self
            .client
            .post(self.base.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::RemoteSync(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteSync(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::RemoteSync(e.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(PushAck::default());
        }
        serde_json::from_slice(&body).map_err(|e| Error::RemoteSync(format!("bad response: {e}")))
    }

    async fn fetch(&self, email: &str) -> Result<Option<RemoteCart>> {
        let response = self
            .client
            .get(self.pull_url(email)?)
            .send()
            .await
            .map_err(|e| Error::RemoteFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteFetch(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::RemoteFetch(e.to_string()))?;
        RemoteCartEnvelope::decode(&body)
    }
}
