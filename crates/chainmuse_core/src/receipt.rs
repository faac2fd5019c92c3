//! Results of ledger mints and of the creation pipeline.

use crate::{Address, ContentRecord, ContentRef, NodeId, TxDigest};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What the ledger reports back for an accepted mint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    /// Creating transaction
    tx_digest: TxDigest,
    /// Identifier the ledger assigned to the new node
    node_id: NodeId,
    /// Signer of the transaction
    creator: Address,
}

impl MintReceipt {
    /// Creates a new receipt.
    pub fn new(tx_digest: TxDigest, node_id: NodeId, creator: Address) -> Self {
        Self {
            tx_digest,
            node_id,
            creator,
        }
    }
}

/// Caller-visible result of a successful node creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct CreatedNode {
    /// Ledger-assigned node id
    node_id: NodeId,
    /// Creating transaction
    tx_digest: TxDigest,
    /// Where the content record was stored
    content_ref: ContentRef,
    /// Generated narrative text
    text: String,
    /// Signer of the mint
    creator: Address,
    /// Node title
    title: String,
    /// Parent node, `None` for roots
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<NodeId>,
    /// The stored content record
    record: ContentRecord,
}

impl CreatedNode {
    /// Assemble the response from the pipeline's outputs.
    pub fn new(
        receipt: MintReceipt,
        content_ref: ContentRef,
        text: String,
        title: String,
        parent_id: Option<NodeId>,
        record: ContentRecord,
    ) -> Self {
        Self {
            node_id: receipt.node_id,
            tx_digest: receipt.tx_digest,
            creator: receipt.creator,
            content_ref,
            text,
            title,
            parent_id,
            record,
        }
    }
}
