//! HTTP access for meta service discovery.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::HttpError;

/// Connect timeout of the default client.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
/// Overall request timeout of the default client.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues GET requests. Abstraction for testing.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET the URL. `Ok(None)` means the server answered without a body
    /// (204 / 304); `Ok(Some(body))` carries the raw response text.
    async fn get(&self, url: &str) -> Result<Option<String>, HttpError>;
}

/// Reqwest-based HTTP client.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client with the default connect and read timeouts.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(read)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<Option<String>, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT
            || status == reqwest::StatusCode::NOT_MODIFIED
        {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Some(body))
    }
}
