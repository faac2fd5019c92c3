//! Narrative nodes as materialized on the ledger.

use crate::{Address, ContentRef, NodeId, TxDigest};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Whether a node starts a tree or continues an existing node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Node without a parent
    #[display("root")]
    Root,
    /// Node with exactly one parent
    #[display("child")]
    Child,
}

/// A node of the narrative forest.
///
/// Exists only after a successful mint; every field is immutable.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct NarrativeNode {
    /// Ledger-assigned identifier
    node_id: NodeId,
    /// Caller-supplied title
    title: String,
    /// Reference to the content record written before the mint
    content_ref: ContentRef,
    /// Parent node, `None` for roots
    #[builder(default)]
    parent_id: Option<NodeId>,
    /// Signer that submitted the mint
    creator: Address,
    /// Ledger-assigned creation time in milliseconds, when the ledger reports one
    #[builder(default)]
    created_at: Option<u64>,
    /// Transaction that created the node, when the ledger reports one
    #[builder(default)]
    tx_digest: Option<TxDigest>,
}

impl NarrativeNode {
    /// Returns a builder for constructing a node.
    pub fn builder() -> NarrativeNodeBuilder {
        NarrativeNodeBuilder::default()
    }

    /// Root or child, derived from the parent link.
    pub fn kind(&self) -> NodeKind {
        if self.parent_id.is_some() {
            NodeKind::Child
        } else {
            NodeKind::Root
        }
    }

    /// True when the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
