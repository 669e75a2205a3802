//! # Fetch Module
//!
//! Retrieves screenshot bytes from their storage locator.
//!
//! The intake workflow only sees the [`ImageSource`] trait; the concrete
//! backend (CDN over HTTP, object storage, in-memory fixtures) is the
//! caller's choice. Fetching is the single effectful step before hashing
//! and must not mutate shared state.

mod http;

pub use http::HttpImageSource;

use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of raw screenshot bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the raw bytes behind a locator.
    ///
    /// Fetch failures (unreachable storage, non-2xx status, timeout) are
    /// distinct from decode failures, which are only discovered later by
    /// the hasher.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}

/// In-memory image source for tests and embedding.
///
/// Locators not present in the map fail with
/// [`FetchError::Unreachable`].
#[derive(Debug, Default)]
pub struct InMemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a locator
    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(locator.into(), bytes);
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(locator, bytes);
        self
    }
}

#[async_trait]
impl ImageSource for InMemoryImageSource {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        self.images
            .get(locator)
            .cloned()
            .ok_or_else(|| FetchError::Unreachable {
                locator: locator.to_string(),
                reason: "no image registered for locator".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_source_returns_registered_bytes() {
        let source = InMemoryImageSource::new().with("shot-1", vec![1, 2, 3]);
        assert_eq!(source.fetch("shot-1").await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_locator_is_unreachable() {
        let source = InMemoryImageSource::new();
        let err = source.fetch("missing").await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }));
    }
}
