//! Narrative generation providers for ChainMuse.
//!
//! [`OpenRouterClient`] talks to an OpenAI-compatible chat API;
//! [`SimulatedGenerator`] stands in when no API key is configured.
//! [`build_generator`] picks one explicitly from configuration.

mod config;
pub mod openrouter;
mod simulated;

pub use config::GenerationConfig;
pub use openrouter::{Language, OpenRouterClient};
pub use simulated::SimulatedGenerator;

use chainmuse_error::GenerationError;
use chainmuse_interface::NarrativeGenerator;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the generator selected by `config`.
///
/// A missing API key selects [`SimulatedGenerator`].
///
/// # Errors
///
/// Returns an error if a key is present but the live client cannot be built.
pub fn build_generator(
    config: &GenerationConfig,
) -> Result<Arc<dyn NarrativeGenerator>, GenerationError> {
    match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            info!(api_base = %config.api_base, "Using OpenRouter generator");
            Ok(Arc::new(OpenRouterClient::new(config.clone())?))
        }
        _ => {
            warn!("No generation API key configured, using simulated generator");
            Ok(Arc::new(SimulatedGenerator::new()))
        }
    }
}
