//! Content store capabilities.

use async_trait::async_trait;
use chainmuse_core::{AdapterMode, ContentRef};
use chainmuse_error::ContentError;

/// Durable, immutable blob storage addressed by opaque references.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a blob and return a reference that resolves to it.
    ///
    /// Fails with `StoreUnavailable` instead of returning a reference that
    /// does not resolve to the stored payload.
    async fn store(&self, blob: &[u8]) -> Result<ContentRef, ContentError>;

    /// Resolve a reference to its payload.
    ///
    /// Fails with `ContentUnavailable` once every retrieval path is exhausted.
    async fn fetch(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError>;

    /// Live or simulated.
    fn mode(&self) -> AdapterMode;
}

/// One of several equivalent ways to retrieve stored content.
#[async_trait]
pub trait RetrievalEndpoint: Send + Sync {
    /// Endpoint name for logging.
    fn name(&self) -> &str;

    /// Fetch the payload for `content_ref` from this endpoint only.
    async fn retrieve(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError>;
}
