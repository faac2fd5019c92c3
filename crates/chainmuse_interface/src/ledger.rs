//! Ledger minting and query capabilities.

use async_trait::async_trait;
use chainmuse_core::{
    AdapterMode, Address, ContentRef, GraphStats, MintReceipt, NarrativeNode, NodeCreatedEvent,
    NodeId,
};
use chainmuse_error::LedgerError;

/// Submits node-creation transactions under a fixed signer.
///
/// The signer is bound at construction; callers never pass key material.
#[async_trait]
pub trait LedgerMinter: Send + Sync {
    /// Create a root node.
    async fn mint_root(
        &self,
        title: &str,
        content_ref: &ContentRef,
    ) -> Result<MintReceipt, LedgerError>;

    /// Create a child of `parent_id`.
    ///
    /// Fails with `InvalidParent` when the ledger reports that the parent does
    /// not exist.
    async fn mint_child(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent_id: &NodeId,
    ) -> Result<MintReceipt, LedgerError>;

    /// Address of the signer.
    fn signer_address(&self) -> &Address;

    /// Live or simulated.
    fn mode(&self) -> AdapterMode;
}

/// Read side of the ledger: node records and the creation event stream.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Every node in this reader's scope.
    async fn list_nodes(&self) -> Result<Vec<NarrativeNode>, LedgerError>;

    /// Up to `limit` creation events, most recent first.
    async fn list_events(&self, limit: usize) -> Result<Vec<NodeCreatedEvent>, LedgerError>;

    /// A single node, `None` if the ledger has no such node.
    async fn get_node(&self, node_id: &NodeId) -> Result<Option<NarrativeNode>, LedgerError>;

    /// Network name reported alongside statistics.
    fn network(&self) -> &str;

    /// Package or contract the reader queries.
    fn package_id(&self) -> &str;

    /// Root/branch counts over the latest `limit` events.
    ///
    /// Exact only when `limit` is at least the number of events on the ledger.
    async fn compute_stats(&self, limit: usize) -> Result<GraphStats, LedgerError> {
        let events = self.list_events(limit).await?;
        Ok(GraphStats::classify(&events))
    }
}
