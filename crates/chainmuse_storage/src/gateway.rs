//! HTTP retrieval gateways (read path).

use async_trait::async_trait;
use chainmuse_core::ContentRef;
use chainmuse_error::{ContentError, ContentErrorKind};
use chainmuse_interface::RetrievalEndpoint;
use reqwest::Client;
use tracing::{debug, instrument};

/// A gateway serving content at `{base_url}/{content_ref}`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    name: String,
    base_url: String,
    client: Client,
}

impl HttpGateway {
    /// Creates a gateway; its name is the base URL.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            name: base_url.clone(),
            base_url,
            client,
        }
    }

    fn failure(&self, message: impl Into<String>) -> ContentError {
        ContentError::new(ContentErrorKind::Endpoint {
            endpoint: self.name.clone(),
            message: message.into(),
        })
    }
}

#[async_trait]
impl RetrievalEndpoint for HttpGateway {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(gateway = %self.name))]
    async fn retrieve(&self, content_ref: &ContentRef) -> Result<Vec<u8>, ContentError> {
        let cid = content_ref.as_str();
        if cid.is_empty() || !cid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(self.failure(format!("'{}' is not a content identifier", cid)));
        }

        let url = format!("{}/{}", self.base_url, cid);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                self.failure("timed out")
            } else {
                self.failure(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.failure(format!("status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.failure(format!("body read failed: {}", e)))?;
        debug!(bytes = body.len(), "Gateway returned content");
        Ok(body.to_vec())
    }
}
