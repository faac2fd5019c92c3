//! Narrative text generation.

use async_trait::async_trait;
use chainmuse_core::{AdapterMode, GenerationRequest};
use chainmuse_error::GenerationError;

/// Produces narrative text from a prompt and optional parent context.
///
/// Implementations make a single attempt per call; retry policy belongs to
/// whoever issues the creation request.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Generate narrative text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Models the provider offers for narrative generation.
    async fn list_models(&self) -> Vec<String>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;

    /// Live or simulated.
    fn mode(&self) -> AdapterMode;
}
