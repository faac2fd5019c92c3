//! Pinning service client (write path).

use chainmuse_core::ContentRef;
use chainmuse_error::{ContentError, ContentErrorKind};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const UPLOAD_FILE_NAME: &str = "story-node.json";

/// Response body of a successful pin.
#[derive(Debug, Clone, Deserialize)]
pub struct PinResponse {
    /// Content identifier of the pinned file
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    /// Size of the pinned file in bytes
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
    /// Pin time as reported by the service
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
}

/// Uploads blobs to an IPFS pinning service.
#[derive(Debug, Clone)]
pub struct PinningClient {
    client: Client,
    url: String,
    jwt: String,
}

impl PinningClient {
    /// Creates a new pinning client sharing `client`.
    pub fn new(client: Client, url: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            jwt: jwt.into(),
        }
    }

    /// Pin a JSON blob and return its content identifier.
    ///
    /// Any failure, including a timeout, is reported as `StoreUnavailable`.
    #[instrument(skip(self, blob), fields(url = %self.url, bytes = blob.len()))]
    pub async fn pin(&self, blob: &[u8]) -> Result<ContentRef, ContentError> {
        let part = Part::bytes(blob.to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("application/json")
            .map_err(|e| unavailable(format!("Invalid upload part: {}", e)))?;
        let form = Form::new().part("file", part);

        debug!("Uploading content to pinning service");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Pinning request failed");
                unavailable(format!("Pinning request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Pinning service rejected upload");
            return Err(unavailable(format!("Pinning service returned {}: {}", status, body)));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("Unreadable pinning response: {}", e)))?;

        if pinned.ipfs_hash.is_empty() {
            return Err(unavailable("Pinning service returned an empty hash"));
        }

        info!(cid = %pinned.ipfs_hash, size = pinned.pin_size, "Content pinned");
        Ok(ContentRef::new(pinned.ipfs_hash))
    }
}

#[track_caller]
fn unavailable(message: impl Into<String>) -> ContentError {
    ContentError::new(ContentErrorKind::StoreUnavailable(message.into()))
}
