//! `llm` crate wrapper implementing [`CompletionClient`].
//!
//! The llm crate bakes system prompt, temperature and token limit into the
//! provider at build time, so [`LlmCompletionClient`] stores the connection
//! settings and builds a provider per request.

use async_trait::async_trait;
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use tracing::instrument;

use super::traits::{CompletionClient, CompletionRequest};
use crate::{AnalysisError, Result};

/// Model used when the configuration names none.
pub const DEFAULT_HOSTED_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completion client for the hosted provider (OpenAI backend).
///
/// ```ignore
/// use huginn::providers::LlmCompletionClient;
///
/// let client = LlmCompletionClient::new("sk-your-key", "gpt-4o-mini").timeout_secs(30);
/// ```
pub struct LlmCompletionClient {
    backend: LLMBackend,
    api_key: String,
    model: String,
    /// Override for the provider's base URL.
    base_url: Option<String>,
    timeout_secs: u64,
}

impl LlmCompletionClient {
    /// Create a client for the OpenAI backend.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            backend: LLMBackend::OpenAI,
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout_secs: 60,
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Model this client sends requests to.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_provider(&self, request: &CompletionRequest) -> Result<Box<dyn LLMProvider>> {
        let mut builder = LLMBuilder::new()
            .backend(self.backend.clone())
            .api_key(&self.api_key)
            .model(&self.model)
            .timeout_seconds(self.timeout_secs)
            .system(&request.system)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);

        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url.clone());
        }

        builder
            .build()
            .map_err(|e| AnalysisError::Llm(e.to_string()))
    }
}

#[async_trait]
impl CompletionClient for LlmCompletionClient {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(name = "llm.complete", skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let provider = self.build_provider(request)?;
        let messages = vec![ChatMessage::user().content(request.prompt.clone()).build()];

        let response = provider
            .chat(&messages)
            .await
            .map_err(AnalysisError::from)?;

        response
            .text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)
    }
}
