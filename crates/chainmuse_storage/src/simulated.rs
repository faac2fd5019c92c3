//! In-memory content-addressed store.
//!
//! Stands in for the pinning service when no credentials are configured.
//! References are derived from the payload hash, so every reference it
//! returns resolves to the stored bytes.

use async_trait::async_trait;
use chainmuse_core::{AdapterMode, ContentRef};
use chainmuse_error::{ContentError, ContentErrorKind};
use chainmuse_interface::ContentStore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

const REF_PREFIX: &str = "sim";

/// Content store keeping blobs in a process-local map.
///
/// All data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct SimulatedContentStore {
    blobs: Arc<RwLock<HashMap<ContentRef, Vec<u8>>>>,
}

impl SimulatedContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference the store assigns to `blob`.
    pub fn reference_for(blob: &[u8]) -> ContentRef {
        let digest = Sha256::digest(blob);
        ContentRef::new(format!("{}{}", REF_PREFIX, hex::encode(digest)))
    }

    /// Number of stored blobs (for testing).
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Check if the store is empty (for testing).
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for SimulatedContentStore {
    async fn store(&self, blob: &[u8]) -> Result<ContentRef, ContentError> {
        let content_ref = Self::reference_for(blob);
        self.blobs
            .write()
            .await
            .entry(content_ref.clone())
            .or_insert_with(|| blob.to_vec());
        debug!(content_ref = %content_ref, "Stored simulated content");
        Ok(content_ref)
    }

    async fn fetch(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError> {
        self.blobs
            .read()
            .await
            .get(content_ref)
            .cloned()
            .ok_or_else(|| {
                ContentError::new(ContentErrorKind::ContentUnavailable {
                    content_ref: content_ref.to_string(),
                    attempts: 1,
                })
            })
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}
