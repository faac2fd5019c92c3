//! In-process generator used when no provider is configured.

use async_trait::async_trait;
use chainmuse_core::{AdapterMode, GenerationRequest};
use chainmuse_error::GenerationError;
use chainmuse_interface::NarrativeGenerator;
use tracing::debug;

/// Deterministic generator that writes a short placeholder story from the
/// prompt.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGenerator;

impl SimulatedGenerator {
    /// Creates a new simulated generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NarrativeGenerator for SimulatedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!(model = %request.model(), "Simulating story generation");
        let opening = if request.parent_context().is_some() {
            "Continuing from the previous story..."
        } else {
            "Starting a new adventure..."
        };
        Ok(format!(
            "A story grown from the prompt \"{}\". {} The hero faces new challenges \
             and mysteries unfold. What happens next is up to you!",
            request.prompt(),
            opening
        ))
    }

    async fn list_models(&self) -> Vec<String> {
        vec![
            "mistralai/mistral-7b-instruct".to_string(),
            "meta-llama/llama-3-8b-instruct".to_string(),
            "anthropic/claude-3-haiku".to_string(),
        ]
    }

    fn provider_name(&self) -> &'static str {
        "simulated"
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_reflects_prompt_and_context() {
        let generator = SimulatedGenerator::new();
        let root = generator
            .generate(&GenerationRequest::new("a red door", None, "m"))
            .await
            .unwrap();
        assert!(root.contains("a red door"));
        assert!(root.contains("new adventure"));

        let child = generator
            .generate(&GenerationRequest::new("p", Some("ctx".into()), "m"))
            .await
            .unwrap();
        assert!(child.contains("Continuing"));
    }
}
