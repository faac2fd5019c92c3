//! Content store adapters for ChainMuse.
//!
//! Narrative text is stored as an immutable JSON record before any ledger
//! write. [`IpfsContentStore`] pins records through a pinning service and
//! reads them back through an ordered list of gateways;
//! [`SimulatedContentStore`] keeps them in memory.

mod config;
mod gateway;
mod ipfs;
mod pinning;
mod simulated;

pub use config::ContentConfig;
pub use gateway::HttpGateway;
pub use ipfs::{IpfsContentStore, fetch_with_fallback};
pub use pinning::{PinResponse, PinningClient};
pub use simulated::SimulatedContentStore;

use chainmuse_error::ContentError;
use chainmuse_interface::ContentStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the content store selected by `config`.
///
/// A missing JWT selects [`SimulatedContentStore`].
///
/// # Errors
///
/// Returns an error if a JWT is present but the live store cannot be built.
pub fn build_content_store(config: &ContentConfig) -> Result<Arc<dyn ContentStore>, ContentError> {
    match config.jwt.as_deref() {
        Some(jwt) if !jwt.is_empty() => {
            info!(gateways = config.gateways.len(), "Using IPFS content store");
            Ok(Arc::new(IpfsContentStore::from_config(config)?))
        }
        _ => {
            warn!("No pinning JWT configured, using simulated content store");
            Ok(Arc::new(SimulatedContentStore::new()))
        }
    }
}
