//! HTTP image source backed by reqwest.

use super::ImageSource;
use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches screenshot bytes from a CDN/object-storage URL
pub struct HttpImageSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpImageSource {
    /// Create a source with the default 10s timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    /// Create a source with an explicit per-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(locator)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        locator: locator.to_string(),
                    }
                } else {
                    FetchError::Unreachable {
                        locator: locator.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    locator: locator.to_string(),
                }
            } else {
                FetchError::Unreachable {
                    locator: locator.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        Ok(bytes.to_vec())
    }
}
