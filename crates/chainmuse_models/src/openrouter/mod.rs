//! OpenRouter generation provider.
//!
//! Speaks the OpenAI chat completions format, so any compatible endpoint
//! can be configured through `api_base`.

mod client;
mod dto;
pub mod prompt;

pub use client::{FALLBACK_MODELS, OpenRouterClient};
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ModelEntry, ModelList};
pub use prompt::Language;
