use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IoError;

/// Trait for fetching whole resources (descriptors and tiles) by URL.
///
/// This abstraction lets the loader and tile fetcher work against HTTP in
/// production and against in-memory fixtures in tests. Implementations must
/// be thread-safe.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the full body of `url`.
    ///
    /// Any non-success status is an error; 404 maps to [`IoError::NotFound`].
    async fn fetch(&self, url: &str) -> Result<Bytes, IoError>;

    /// Fetch `url` and decode it as UTF-8 text.
    ///
    /// Invalid sequences are replaced rather than rejected; the XML parser
    /// reports anything that matters.
    async fn fetch_text(&self, url: &str) -> Result<String, IoError> {
        let body = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> Result<Bytes, IoError> {
        (**self).fetch(url).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String, IoError> {
        (**self).fetch_text(url).await
    }
}
