//! Sui network selection.

use serde::{Deserialize, Serialize};

/// Public Sui network, used to pick a fullnode when no RPC URL is configured.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Mainnet
    #[display("mainnet")]
    Mainnet,
    /// Testnet
    #[default]
    #[display("testnet")]
    Testnet,
    /// Devnet
    #[display("devnet")]
    Devnet,
    /// Local validator
    #[display("localnet")]
    Localnet,
}

impl Network {
    /// Public fullnode JSON-RPC URL.
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}
