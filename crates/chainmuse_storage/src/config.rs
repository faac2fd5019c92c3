//! Content store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the pinning service and retrieval gateways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Pinning endpoint that accepts multipart file uploads
    #[serde(default = "default_pinning_url")]
    pub pinning_url: String,
    /// Pinning service JWT; absent selects the simulated store
    #[serde(default)]
    pub jwt: Option<String>,
    /// Retrieval gateways in preference order; the reference is appended
    #[serde(default = "default_gateways")]
    pub gateways: Vec<String>,
    /// Timeout for the pinning call and for each gateway attempt
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            pinning_url: default_pinning_url(),
            jwt: None,
            gateways: default_gateways(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_pinning_url() -> String {
    "https://api.pinata.cloud/pinning/pinFileToIPFS".to_string()
}

fn default_gateways() -> Vec<String> {
    vec![
        "https://gateway.pinata.cloud/ipfs".to_string(),
        "https://ipfs.io/ipfs".to_string(),
        "https://cloudflare-ipfs.com/ipfs".to_string(),
    ]
}

fn default_timeout() -> u64 {
    10
}
