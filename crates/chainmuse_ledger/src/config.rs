//! Ledger configuration.

use crate::Network;
use serde::{Deserialize, Serialize};

/// Settings for the ledger minting and query services.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Network used when `rpc_url` is absent
    #[serde(default)]
    pub network: Network,
    /// Explicit JSON-RPC endpoint
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Package that defines the story module; absent or `0x0` selects the simulated ledger
    #[serde(default)]
    pub package_id: Option<String>,
    /// Move module holding the node type and entry functions
    #[serde(default = "default_module")]
    pub module: String,
    /// Signing key (hex, base64 `flag || key`, or bech32 `suiprivkey…`)
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Gas budget per mint transaction, in MIST
    #[serde(default = "default_gas_budget")]
    pub gas_budget: u64,
    /// Timeout for each RPC call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LedgerConfig {
    /// JSON-RPC endpoint in effect.
    pub fn endpoint(&self) -> String {
        self.rpc_url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.network.fullnode_url().to_string())
    }

    /// Configured package id, ignoring the `0x0` placeholder.
    pub fn effective_package_id(&self) -> Option<&str> {
        self.package_id
            .as_deref()
            .filter(|p| !p.is_empty() && *p != "0x0")
    }

    /// Configured secret key, ignoring empty values.
    pub fn effective_secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            package_id: None,
            module: default_module(),
            secret_key: None,
            gas_budget: default_gas_budget(),
            timeout_secs: default_timeout(),
        }
    }
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("package_id", &self.package_id)
            .field("module", &self.module)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("gas_budget", &self.gas_budget)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_module() -> String {
    "story".to_string()
}

fn default_gas_budget() -> u64 {
    10_000_000
}

fn default_timeout() -> u64 {
    30
}
