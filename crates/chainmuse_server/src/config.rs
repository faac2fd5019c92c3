//! Server configuration loaded from TOML and the environment.

use chainmuse_error::ConfigError;
use chainmuse_ledger::{LedgerConfig, Network};
use chainmuse_models::GenerationConfig;
use chainmuse_storage::ContentConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{debug, info};

/// Complete configuration, built once at startup and handed to each
/// adapter's constructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainmuseConfig {
    /// HTTP listener and query windows
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger endpoint, package and signer
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Pinning service and retrieval gateways
    #[serde(default)]
    pub content: ContentConfig,
    /// Generation provider
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Events returned by `/blockchain/events` and `/graph` without `limit`
    #[serde(default = "default_events_limit")]
    pub events_limit: usize,
    /// Events scanned for `/blockchain/stats`; also caps any requested `limit`
    #[serde(default = "default_stats_scan_limit")]
    pub stats_scan_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            events_limit: default_events_limit(),
            stats_scan_limit: default_stats_scan_limit(),
        }
    }
}

impl ServerConfig {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::new(format!("invalid bind address '{}': {}", self.bind, e)))
    }

    /// Number of events to read for a request asking for `requested`.
    pub fn event_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.events_limit)
            .min(self.stats_scan_limit)
    }
}

fn default_bind() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_events_limit() -> usize {
    50
}

fn default_stats_scan_limit() -> usize {
    1000
}

impl ChainmuseConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::new(format!("invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Load `.env`, then the optional file, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable or an override is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded .env");
        }
        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment-style overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if `SUI_NETWORK` or `BACKEND_PORT` cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(network) = get("SUI_NETWORK") {
            self.ledger.network = network.parse::<Network>().map_err(ConfigError::new)?;
        }
        if let Some(url) = get("SUI_RPC_URL") {
            self.ledger.rpc_url = Some(url);
        }
        if let Some(package) = get("SUI_PACKAGE_ID") {
            self.ledger.package_id = Some(package);
        }
        if let Some(key) = get("SUI_ADMIN_SECRET_KEY") {
            self.ledger.secret_key = Some(key);
        }
        if let Some(jwt) = get("PINATA_JWT") {
            self.content.jwt = Some(jwt);
        }
        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.generation.api_key = Some(key);
        }
        if let Some(referrer) = get("OPENROUTER_REFERRER") {
            self.generation.referrer = referrer;
        }
        if let Some(app_name) = get("OPENROUTER_APP_NAME") {
            self.generation.app_name = app_name;
        }
        if let Some(port) = get("BACKEND_PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("invalid BACKEND_PORT '{}': {}", port, e)))?;
            let mut addr = self.server.socket_addr()?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        Ok(())
    }
}
