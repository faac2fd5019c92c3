//! Response bodies of the HTTP API.

use chainmuse_core::{ContentRecord, CreatedNode};
use serde::Serialize;

/// Result of a successful create call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub message: &'static str,
    pub title: String,
    /// Generated text
    pub content: String,
    pub ipfs_cid: String,
    pub transaction_digest: String,
    /// Ledger id of the new node
    pub object_id: String,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_object_id: Option<String>,
    /// The stored content record
    pub metadata: ContentRecord,
}

impl CreatedResponse {
    /// Render a pipeline result.
    pub fn new(message: &'static str, created: CreatedNode) -> Self {
        Self {
            message,
            title: created.title().clone(),
            content: created.text().clone(),
            ipfs_cid: created.content_ref().to_string(),
            transaction_digest: created.tx_digest().to_string(),
            object_id: created.node_id().to_string(),
            creator: created.creator().to_string(),
            parent_object_id: created.parent_id().as_ref().map(ToString::to_string),
            metadata: created.record().clone(),
        }
    }
}

/// Operating mode of each adapter.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceModes {
    pub sui: String,
    pub openrouter: String,
    pub ipfs: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: ServiceModes,
    /// Address the server mints under
    pub admin_address: String,
    pub network: String,
    pub package_id: String,
}
