// src/upstream/mod.rs

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::FetchError;

pub mod retry;

pub use retry::{fetch_with_retry, fetch_with_timeout, AttemptOutcome, RetryOutcome, RetryPolicy};

/// A fully-read upstream response. The status is not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossy. Used for log lines only.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The transport used to reach the upstream API.
///
/// One call is one attempt: implementations must not retry on their own, and
/// should read the whole body before returning so the caller's timeout covers it.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// Upstream backed by a shared `reqwest::Client`.
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();

        log::debug!("upstream {} -> {} ({} bytes)", url, status, body.len());

        Ok(RawResponse { status, body })
    }
}
