//! Generation provider configuration.

use chainmuse_core::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};

/// Settings for the OpenRouter-compatible generation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API root; `/chat/completions` and `/models` are appended
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer token; absent selects the simulated generator
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sent as `HTTP-Referer`
    #[serde(default = "default_referrer")]
    pub referrer: String,
    /// Sent as `X-Title`
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Per-call timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            default_model: default_model(),
            referrer: default_referrer(),
            app_name: default_app_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_referrer() -> String {
    "https://chainmuse.app".to_string()
}

fn default_app_name() -> String {
    "ChainMuse".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    600
}

fn default_top_p() -> f32 {
    0.9
}

fn default_timeout() -> u64 {
    60
}
