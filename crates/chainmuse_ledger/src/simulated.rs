//! In-memory ledger used when no package or signing key is configured.

use async_trait::async_trait;
use chainmuse_core::{
    AdapterMode, Address, ContentRef, MintReceipt, NarrativeNode, NodeCreatedEvent, NodeId,
    TxDigest,
};
use chainmuse_error::{LedgerError, LedgerErrorKind};
use chainmuse_interface::{LedgerMinter, LedgerReader};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Address used by the simulated signer unless one is supplied.
pub const SIMULATED_SIGNER: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Debug, Default)]
struct LedgerState {
    nodes: Vec<NarrativeNode>,
    events: Vec<NodeCreatedEvent>,
    index: HashMap<NodeId, usize>,
    sequence: u64,
    last_timestamp: u64,
}

/// Ledger kept in process memory.
///
/// Mints are validated the way the real ledger validates them: a child's
/// parent must already exist. Node ids and digests are derived from a
/// sequence number, and timestamps strictly increase with each mint.
/// Cloning shares the same state, so one instance serves as both minter and
/// reader.
#[derive(Debug, Clone)]
pub struct SimulatedLedger {
    state: Arc<RwLock<LedgerState>>,
    signer: Address,
    network: String,
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new(Address::new(SIMULATED_SIGNER))
    }
}

impl SimulatedLedger {
    /// Create an empty ledger minting as `signer`.
    pub fn new(signer: Address) -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState::default())),
            signer,
            network: "simulated".to_string(),
        }
    }

    /// Number of minted nodes.
    pub async fn len(&self) -> usize {
        self.state.read().await.nodes.len()
    }

    /// True when nothing has been minted.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.nodes.is_empty()
    }

    async fn mint(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent_id: Option<&NodeId>,
    ) -> Result<MintReceipt, LedgerError> {
        let mut state = self.state.write().await;

        if let Some(parent) = parent_id {
            if !state.index.contains_key(parent) {
                return Err(LedgerError::new(LedgerErrorKind::InvalidParent(
                    parent.to_string(),
                )));
            }
        }

        state.sequence += 1;
        let sequence = state.sequence;
        let timestamp: u64 = chrono::Utc::now()
            .timestamp_millis()
            .try_into()
            .unwrap_or_default();
        let timestamp = std::cmp::max(timestamp, state.last_timestamp + 1);
        state.last_timestamp = timestamp;

        let node_id = NodeId::new(format!(
            "0x{}",
            digest_hex(&["node", &sequence.to_string(), title, content_ref.as_str()])
        ));
        let tx_digest = TxDigest::new(digest_hex(&["tx", &sequence.to_string()]));

        let node = NarrativeNode::builder()
            .node_id(node_id.clone())
            .title(title)
            .content_ref(content_ref.clone())
            .parent_id(parent_id.cloned())
            .creator(self.signer.clone())
            .created_at(Some(timestamp))
            .tx_digest(Some(tx_digest.clone()))
            .build()
            .map_err(|e| LedgerError::new(LedgerErrorKind::MintRejected(e.to_string())))?;
        let event = NodeCreatedEvent::builder()
            .node_id(node_id.clone())
            .parent_id(parent_id.cloned())
            .creator(self.signer.clone())
            .content_ref(content_ref.clone())
            .title(Some(title.to_string()))
            .timestamp_ms(timestamp)
            .tx_digest(tx_digest.clone())
            .build()
            .map_err(|e| LedgerError::new(LedgerErrorKind::MintRejected(e.to_string())))?;

        let position = state.nodes.len();
        state.nodes.push(node);
        state.events.push(event);
        state.index.insert(node_id.clone(), position);

        debug!(node_id = %node_id, sequence, "Simulated mint");
        Ok(MintReceipt::new(tx_digest, node_id, self.signer.clone()))
    }
}

fn digest_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[async_trait]
impl LedgerMinter for SimulatedLedger {
    #[instrument(skip(self, title))]
    async fn mint_root(
        &self,
        title: &str,
        content_ref: &ContentRef,
    ) -> Result<MintReceipt, LedgerError> {
        self.mint(title, content_ref, None).await
    }

    #[instrument(skip(self, title))]
    async fn mint_child(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent_id: &NodeId,
    ) -> Result<MintReceipt, LedgerError> {
        self.mint(title, content_ref, Some(parent_id)).await
    }

    fn signer_address(&self) -> &Address {
        &self.signer
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}

#[async_trait]
impl LedgerReader for SimulatedLedger {
    async fn list_nodes(&self) -> Result<Vec<NarrativeNode>, LedgerError> {
        Ok(self.state.read().await.nodes.clone())
    }

    async fn list_events(&self, limit: usize) -> Result<Vec<NodeCreatedEvent>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.events.iter().rev().take(limit).cloned().collect())
    }

    async fn get_node(&self, node_id: &NodeId) -> Result<Option<NarrativeNode>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .index
            .get(node_id)
            .and_then(|&i| state.nodes.get(i))
            .cloned())
    }

    fn network(&self) -> &str {
        &self.network
    }

    fn package_id(&self) -> &str {
        "simulated"
    }
}
