//! Ledger services for ChainMuse.
//!
//! [`SuiMintingService`] submits node-creation transactions under a signer
//! bound at construction. [`SuiQueryService`] reads the signer's nodes and
//! the package's creation events. [`SimulatedLedger`] implements both in
//! memory for runs without a deployed package.

mod config;
mod dto;
mod minting;
mod network;
mod parse;
mod query;
mod rpc;
mod signer;
mod simulated;

pub use config::LedgerConfig;
pub use minting::SuiMintingService;
pub use network::Network;
pub use query::SuiQueryService;
pub use rpc::{RpcFailure, SuiRpcClient};
pub use signer::{SuiSigner, derive_address};
pub use simulated::{SIMULATED_SIGNER, SimulatedLedger};

use chainmuse_error::LedgerError;
use chainmuse_interface::{LedgerMinter, LedgerReader};
use std::sync::Arc;
use tracing::{info, warn};

/// Write and read sides of one ledger.
#[derive(Clone)]
pub struct LedgerServices {
    /// Mints nodes
    pub minter: Arc<dyn LedgerMinter>,
    /// Lists nodes, events and statistics
    pub reader: Arc<dyn LedgerReader>,
}

impl std::fmt::Debug for LedgerServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerServices")
            .field("minter", &self.minter.mode())
            .field("network", &self.reader.network())
            .field("package_id", &self.reader.package_id())
            .finish()
    }
}

/// Build the ledger services selected by `config`.
///
/// Both a package id and a secret key select the Sui services, with reads
/// scoped to the signer's address. Otherwise both sides share one
/// [`SimulatedLedger`].
///
/// # Errors
///
/// Returns an error if the secret key cannot be loaded or the RPC client
/// cannot be built.
pub fn build_ledger(config: &LedgerConfig) -> Result<LedgerServices, LedgerError> {
    match (config.effective_package_id(), config.effective_secret_key()) {
        (Some(package_id), Some(secret)) => {
            let signer = Arc::new(SuiSigner::from_secret(secret)?);
            let endpoint = config.endpoint();
            let rpc = Arc::new(SuiRpcClient::new(endpoint.clone(), config.timeout_secs)?);
            info!(
                %endpoint,
                package_id,
                signer = %signer.address(),
                "Using Sui ledger"
            );

            let reader = SuiQueryService::new(
                rpc.clone(),
                package_id,
                config.module.clone(),
                signer.address().clone(),
                config.network.to_string(),
            );
            let minter = SuiMintingService::new(
                rpc,
                signer,
                package_id,
                config.module.clone(),
                config.gas_budget,
            );
            Ok(LedgerServices {
                minter: Arc::new(minter),
                reader: Arc::new(reader),
            })
        }
        (package_id, secret) => {
            warn!(
                package_configured = package_id.is_some(),
                key_configured = secret.is_some(),
                "Ledger not fully configured, using simulated ledger"
            );
            let ledger = SimulatedLedger::default();
            Ok(LedgerServices {
                minter: Arc::new(ledger.clone()),
                reader: Arc::new(ledger),
            })
        }
    }
}
