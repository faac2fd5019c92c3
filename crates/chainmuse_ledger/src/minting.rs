//! Node minting against a Sui fullnode.

use crate::dto::{ObjectChange, TransactionBlockResponse, TransactionBytes};
use crate::parse::is_move_type;
use crate::rpc::{RpcFailure, SuiRpcClient};
use crate::SuiSigner;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chainmuse_core::{AdapterMode, Address, ContentRef, MintReceipt, NodeId, TxDigest};
use chainmuse_error::{LedgerError, LedgerErrorKind};
use chainmuse_interface::LedgerMinter;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const ROOT_FUNCTION: &str = "create_root_story";
const CHILD_FUNCTION: &str = "create_child_story";
const NODE_TYPE: &str = "StoryNode";

/// Mints narrative nodes by calling the story module's entry functions.
///
/// Each mint builds the transaction on the fullnode, signs it locally with
/// the bound signer and executes it. A mint is submitted exactly once.
#[derive(Debug, Clone)]
pub struct SuiMintingService {
    rpc: Arc<SuiRpcClient>,
    signer: Arc<SuiSigner>,
    package_id: String,
    module: String,
    gas_budget: u64,
}

impl SuiMintingService {
    /// Create a minting service for `package_id::module`.
    pub fn new(
        rpc: Arc<SuiRpcClient>,
        signer: Arc<SuiSigner>,
        package_id: impl Into<String>,
        module: impl Into<String>,
        gas_budget: u64,
    ) -> Self {
        Self {
            rpc,
            signer,
            package_id: package_id.into(),
            module: module.into(),
            gas_budget,
        }
    }

    #[instrument(skip(self, arguments), fields(package = %self.package_id, module = %self.module))]
    async fn submit(
        &self,
        function: &str,
        arguments: Vec<Value>,
        parent: Option<&NodeId>,
    ) -> Result<MintReceipt, LedgerError> {
        let unsigned: TransactionBytes = self
            .rpc
            .call(
                "unsafe_moveCall",
                json!([
                    self.signer.address(),
                    self.package_id,
                    self.module,
                    function,
                    [],
                    arguments,
                    Value::Null,
                    self.gas_budget.to_string(),
                ]),
            )
            .await
            .map_err(|failure| mint_failure(failure, parent))?;

        let tx_bytes = STANDARD.decode(&unsigned.tx_bytes).map_err(|e| {
            LedgerError::new(LedgerErrorKind::MintRejected(format!(
                "fullnode returned undecodable transaction bytes: {}",
                e
            )))
        })?;
        let signature = self.signer.sign_transaction(&tx_bytes);

        let response: TransactionBlockResponse = self
            .rpc
            .call(
                "sui_executeTransactionBlock",
                json!([
                    unsigned.tx_bytes,
                    [signature],
                    {
                        "showEffects": true,
                        "showEvents": true,
                        "showObjectChanges": true,
                    },
                    "WaitForLocalExecution",
                ]),
            )
            .await
            .map_err(|failure| mint_failure(failure, parent))?;

        let receipt = extract_receipt(&response, &self.module, self.signer.address(), parent)?;
        info!(
            function,
            node_id = %receipt.node_id(),
            tx_digest = %receipt.tx_digest(),
            "Node minted"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl LedgerMinter for SuiMintingService {
    #[instrument(skip(self, title), fields(content_ref = %content_ref))]
    async fn mint_root(
        &self,
        title: &str,
        content_ref: &ContentRef,
    ) -> Result<MintReceipt, LedgerError> {
        self.submit(
            ROOT_FUNCTION,
            vec![json!(title), json!(content_ref.as_str())],
            None,
        )
        .await
    }

    #[instrument(skip(self, title), fields(content_ref = %content_ref, parent_id = %parent_id))]
    async fn mint_child(
        &self,
        title: &str,
        content_ref: &ContentRef,
        parent_id: &NodeId,
    ) -> Result<MintReceipt, LedgerError> {
        // The entry function takes the parent as a plain ID, so existence is
        // checked here before anything is built.
        let parent = self
            .rpc
            .get_move_object(parent_id.as_str(), &self.module, NODE_TYPE)
            .await
            .map_err(|failure| mint_failure(failure, None))?;
        if parent.is_none() {
            warn!("Parent is not a node on this ledger");
            return Err(LedgerError::new(LedgerErrorKind::InvalidParent(
                parent_id.to_string(),
            )));
        }

        self.submit(
            CHILD_FUNCTION,
            vec![
                json!(title),
                json!(content_ref.as_str()),
                json!(parent_id.as_str()),
            ],
            Some(parent_id),
        )
        .await
    }

    fn signer_address(&self) -> &Address {
        self.signer.address()
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Live
    }
}

/// Turn an execution response into a receipt.
///
/// The transaction must have succeeded and created exactly one object of the
/// module's node type.
pub fn extract_receipt(
    response: &TransactionBlockResponse,
    module: &str,
    creator: &Address,
    parent: Option<&NodeId>,
) -> Result<MintReceipt, LedgerError> {
    let effects = response.effects.as_ref().ok_or_else(|| {
        LedgerError::new(LedgerErrorKind::ReceiptParse(format!(
            "transaction {} has no effects",
            response.digest
        )))
    })?;

    if !effects.status.is_success() {
        let reason = effects
            .status
            .error
            .clone()
            .unwrap_or_else(|| effects.status.status.clone());
        warn!(tx_digest = %response.digest, %reason, "Mint transaction failed");
        return Err(rejection(reason, parent));
    }

    let created: Vec<&str> = response
        .object_changes
        .iter()
        .flatten()
        .filter_map(|change| match change {
            ObjectChange::Created {
                object_id,
                object_type,
            } if is_move_type(object_type, module, NODE_TYPE) => Some(object_id.as_str()),
            _ => None,
        })
        .collect();

    match created.as_slice() {
        [node_id] => Ok(MintReceipt::new(
            TxDigest::new(response.digest.clone()),
            NodeId::new(*node_id),
            creator.clone(),
        )),
        [] => Err(LedgerError::new(LedgerErrorKind::ReceiptParse(format!(
            "transaction {} created no {}::{} object",
            response.digest, module, NODE_TYPE
        )))),
        many => Err(LedgerError::new(LedgerErrorKind::ReceiptParse(format!(
            "transaction {} created {} node objects",
            response.digest,
            many.len()
        )))),
    }
}

fn mint_failure(failure: RpcFailure, parent: Option<&NodeId>) -> LedgerError {
    match failure {
        RpcFailure::Transport(message) => LedgerError::new(LedgerErrorKind::Transport(message)),
        RpcFailure::Timeout(secs) => LedgerError::new(LedgerErrorKind::Timeout(secs)),
        RpcFailure::Rpc { message, .. } => rejection(message, parent),
        RpcFailure::Decode(message) => LedgerError::new(LedgerErrorKind::MintRejected(message)),
    }
}

/// Classify a rejection, singling out a missing parent on child mints.
fn rejection(reason: String, parent: Option<&NodeId>) -> LedgerError {
    match parent {
        Some(parent) if mentions_parent(&reason, parent) => {
            LedgerError::new(LedgerErrorKind::InvalidParent(parent.to_string()))
        }
        _ => LedgerError::new(LedgerErrorKind::MintRejected(reason)),
    }
}

fn mentions_parent(reason: &str, parent: &NodeId) -> bool {
    let lowered = reason.to_ascii_lowercase();
    lowered.contains(&parent.as_str().to_ascii_lowercase())
        || (lowered.contains("parent")
            && (lowered.contains("not found")
                || lowered.contains("does not exist")
                || lowered.contains("notfound")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> TransactionBlockResponse {
        serde_json::from_value(value).expect("transaction response")
    }

    #[test]
    fn receipt_names_created_node() {
        let response = response(json!({
            "digest": "D1",
            "effects": {"status": {"status": "success"}},
            "objectChanges": [
                {"type": "mutated", "objectId": "0xgas", "objectType": "0x2::coin::Coin<0x2::sui::SUI>"},
                {"type": "created", "objectId": "0xn1", "objectType": "0xpkg::story::StoryNode"}
            ]
        }));
        let receipt = extract_receipt(&response, "story", &Address::new("0xme"), None)
            .expect("receipt");

        assert_eq!(receipt.node_id().as_str(), "0xn1");
        assert_eq!(receipt.tx_digest().as_str(), "D1");
        assert_eq!(receipt.creator().as_str(), "0xme");
    }

    #[test]
    fn success_without_node_is_a_parse_error() {
        let response = response(json!({
            "digest": "D2",
            "effects": {"status": {"status": "success"}},
            "objectChanges": []
        }));
        let err = extract_receipt(&response, "story", &Address::new("0xme"), None)
            .expect_err("no node");
        assert!(matches!(err.kind, LedgerErrorKind::ReceiptParse(_)));
    }

    #[test]
    fn failed_execution_is_rejected() {
        let response = response(json!({
            "digest": "D3",
            "effects": {"status": {"status": "failure", "error": "InsufficientGas"}}
        }));
        let err = extract_receipt(&response, "story", &Address::new("0xme"), None)
            .expect_err("failed execution");
        assert_eq!(
            err.kind,
            LedgerErrorKind::MintRejected("InsufficientGas".to_string())
        );
    }

    #[test]
    fn missing_parent_is_classified() {
        let parent = NodeId::new("0xdead");
        let response = response(json!({
            "digest": "D4",
            "effects": {"status": {"status": "failure", "error": "Parent not found"}}
        }));
        let err = extract_receipt(&response, "story", &Address::new("0xme"), Some(&parent))
            .expect_err("missing parent");
        assert_eq!(err.kind, LedgerErrorKind::InvalidParent("0xdead".to_string()));
    }

    #[test]
    fn transport_failures_keep_their_kind() {
        let err = mint_failure(RpcFailure::Timeout(30), None);
        assert_eq!(err.kind, LedgerErrorKind::Timeout(30));

        let err = mint_failure(
            RpcFailure::Rpc {
                code: -32002,
                message: "Could not find the referenced object 0xDEAD".to_string(),
            },
            Some(&NodeId::new("0xdead")),
        );
        assert_eq!(err.kind, LedgerErrorKind::InvalidParent("0xdead".to_string()));
    }
}
