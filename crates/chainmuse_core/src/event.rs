//! Ledger-emitted node creation events and the statistics derived from them.

use crate::{Address, ContentRef, NodeId, NodeKind, TxDigest};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Append-only fact recorded by the ledger when a node is minted.
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
pub struct NodeCreatedEvent {
    /// Node created by the transaction
    node_id: NodeId,
    /// Parent of the created node, `None` for roots
    #[builder(default)]
    parent_id: Option<NodeId>,
    /// Signer of the creating transaction
    creator: Address,
    /// Content reference recorded with the node
    content_ref: ContentRef,
    /// Title recorded with the node, if the event carries one
    #[builder(default)]
    title: Option<String>,
    /// Ledger timestamp in milliseconds
    timestamp_ms: u64,
    /// Creating transaction
    tx_digest: TxDigest,
    /// Position of the event within its transaction
    #[builder(default)]
    event_seq: u64,
}

impl NodeCreatedEvent {
    /// Returns a builder for constructing an event.
    pub fn builder() -> NodeCreatedEventBuilder {
        NodeCreatedEventBuilder::default()
    }

    /// Root or child.
    pub fn kind(&self) -> NodeKind {
        if self.parent_id.is_some() {
            NodeKind::Child
        } else {
            NodeKind::Root
        }
    }
}

/// Root/branch partition of a set of events.
///
/// Derived by classifying each event independently on whether it has a
/// parent, so the result does not depend on event order. Only the events
/// scanned are counted: when the ledger holds more events than the scan
/// window, both counts are lower bounds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters,
)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Events without a parent
    total_roots: usize,
    /// Events with a parent
    total_branches: usize,
    /// Number of events classified
    events_scanned: usize,
}

impl GraphStats {
    /// Classify every event as a root or a branch.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainmuse_core::GraphStats;
    ///
    /// let stats = GraphStats::classify(&[]);
    /// assert_eq!(*stats.total_roots(), 0);
    /// assert_eq!(*stats.events_scanned(), 0);
    /// ```
    pub fn classify<'a>(events: impl IntoIterator<Item = &'a NodeCreatedEvent>) -> Self {
        events
            .into_iter()
            .fold(Self::default(), |mut stats, event| {
                match event.kind() {
                    NodeKind::Root => stats.total_roots += 1,
                    NodeKind::Child => stats.total_branches += 1,
                }
                stats.events_scanned += 1;
                stats
            })
    }
}
