//! Client for the OpenRouter chat completions API.

use crate::GenerationConfig;
use crate::openrouter::{ChatMessage, ChatRequest, ChatResponse, Language, ModelList, prompt};
use async_trait::async_trait;
use chainmuse_core::{AdapterMode, GenerationRequest};
use chainmuse_error::{GenerationError, GenerationErrorKind};
use chainmuse_interface::NarrativeGenerator;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const MAX_LISTED_MODELS: usize = 10;

/// Models reported when the catalogue cannot be fetched.
pub const FALLBACK_MODELS: &[&str] = &[
    "mistralai/mistral-7b-instruct",
    "meta-llama/llama-3-8b-instruct",
];

/// Generation client for OpenRouter and other OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    config: GenerationConfig,
}

impl OpenRouterClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    #[instrument(skip(config), fields(api_base = %config.api_base, model = %config.default_model))]
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        debug!("Created OpenRouter client");

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.api_base.trim_end_matches('/'))
    }

    fn to_chat_request(&self, req: &GenerationRequest) -> Result<ChatRequest, GenerationError> {
        let language = Language::detect(req.prompt());
        let system = prompt::system_prompt(language, req.parent_context().as_deref(), req.prompt());
        let user = prompt::user_message(language, req.prompt());

        ChatRequest::builder()
            .model(req.model().clone())
            .messages(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .temperature(Some(self.config.temperature))
            .max_tokens(Some(self.config.max_tokens))
            .top_p(Some(self.config.top_p))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::ResponseParsing(format!(
                    "Failed to build request: {}",
                    e
                )))
            })
    }

    fn map_transport(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::new(GenerationErrorKind::Timeout(self.config.timeout_secs))
        } else {
            GenerationError::new(GenerationErrorKind::Http(format!("Request failed: {}", err)))
        }
    }

    async fn fetch_models(&self) -> Result<Vec<String>, GenerationError> {
        let response = self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let list: ModelList = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;

        Ok(list
            .data
            .into_iter()
            .map(|m| m.id)
            .filter(|id| id.contains("instruct") || id.contains("chat"))
            .take(MAX_LISTED_MODELS)
            .collect())
    }
}

#[async_trait]
impl NarrativeGenerator for OpenRouterClient {
    #[instrument(skip(self, request), fields(model = %request.model(), has_context = request.parent_context().is_some()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let chat_request = self.to_chat_request(request)?;

        debug!(
            message_count = chat_request.messages().len(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referrer)
            .header("X-Title", &self.config.app_name)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Generation request failed");
                self.map_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Generation API error");
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse generation response");
            GenerationError::new(GenerationErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))?;

        info!(chars = text.len(), "Story content generated");
        Ok(text)
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Model catalogue unavailable, using fallback list");
                FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }

    fn mode(&self) -> AdapterMode {
        AdapterMode::Live
    }
}
