use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use super::Fetcher;
use crate::error::IoError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("dzi-view/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of [`Fetcher`] backed by `reqwest`.
///
/// One client is shared by all requests so connections are pooled. No
/// retries are performed; a failed request is reported once.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self, IoError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, IoError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IoError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, IoError> {
        debug!(url = url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IoError::from_status(status.as_u16(), url));
        }

        response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(e, url))
    }
}

fn map_reqwest_error(err: reqwest::Error, url: &str) -> IoError {
    if err.is_timeout() {
        IoError::Timeout(url.to_string())
    } else if err.is_builder() {
        IoError::InvalidUrl(format!("{}: {}", url, err))
    } else {
        IoError::Connection(err.to_string())
    }
}
