//! Live content store: pin on write, ordered gateway fallback on read.

use crate::{ContentConfig, HttpGateway, PinningClient};
use async_trait::async_trait;
use chainmuse_core::{AdapterMode, ContentRef};
use chainmuse_error::{ContentError, ContentErrorKind};
use chainmuse_interface::{ContentStore, RetrievalEndpoint};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Content store backed by an IPFS pinning service and a prioritized list
/// of equivalent retrieval endpoints.
#[derive(Clone)]
pub struct IpfsContentStore {
    pinning: PinningClient,
    endpoints: Vec<Arc<dyn RetrievalEndpoint>>,
}

impl std::fmt::Debug for IpfsContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpfsContentStore")
            .field("pinning", &self.pinning)
            .field(
                "endpoints",
                &self.endpoints.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl IpfsContentStore {
    /// Build the store from configuration, one [`HttpGateway`] per configured
    /// gateway in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT is missing or the HTTP client cannot be built.
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        let jwt = config
            .jwt
            .clone()
            .filter(|j| !j.is_empty())
            .ok_or_else(|| {
                ContentError::new(ContentErrorKind::StoreUnavailable(
                    "pinning JWT not configured".to_string(),
                ))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContentError::new(ContentErrorKind::StoreUnavailable(e.to_string())))?;

        let endpoints = config
            .gateways
            .iter()
            .map(|base| Arc::new(HttpGateway::new(client.clone(), base)) as Arc<dyn RetrievalEndpoint>)
            .collect();

        Ok(Self::new(
            PinningClient::new(client, config.pinning_url.clone(), jwt),
            endpoints,
        ))
    }

    /// Assemble a store from a pinning client and endpoints in preference order.
    pub fn new(pinning: PinningClient, endpoints: Vec<Arc<dyn RetrievalEndpoint>>) -> Self {
        Self { pinning, endpoints }
    }

    /// Names of the retrieval endpoints, in the order they are tried.
    pub fn endpoint_names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name()).collect()
    }
}

/// Try each endpoint once, in order, until one returns the payload.
///
/// A failing endpoint is never retried; the next one is tried instead.
pub async fn fetch_with_fallback(
    endpoints: &[Arc<dyn RetrievalEndpoint>],
    content_ref: &ContentRef,
) -> Result<Vec<u8>, ContentError> {
    for endpoint in endpoints {
        match endpoint.retrieve(content_ref).await {
            Ok(blob) => {
                info!(endpoint = endpoint.name(), content_ref = %content_ref, "Fetched content");
                return Ok(blob);
            }
            Err(e) => {
                warn!(endpoint = endpoint.name(), error = %e, "Endpoint failed, trying next");
            }
        }
    }

    error!(content_ref = %content_ref, attempts = endpoints.len(), "All endpoints failed");
    Err(ContentError::new(ContentErrorKind::ContentUnavailable {
        content_ref: content_ref.to_string(),
        attempts: endpoints.len(),
    }))
}

#[async_trait]
impl ContentStore for IpfsContentStore {
    #[instrument(skip(self, blob), fields(bytes = blob.len()))]
    async fn store(&self, blob: &[u8]) -> Result<ContentRef, ContentError> {
        self.pinning.pin(blob).await
    }

    #[instrument(skip(self), fields(content_ref = %content_ref))]
    async fn fetch(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError> {
        fetch_with_fallback(&self.endpoints, content_ref).await
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Live
    }
}
