//! Hosted chat-completion backend with caching and admission control.
//!
//! Each operation runs the same sequence:
//!
//! 1. Look the input up in the shared [`AnalysisCache`]. A hit returns
//!    immediately, without touching the rate limiter or the network.
//! 2. On a miss, wait for a slot in the shared [`RateLimiter`] and issue the
//!    completion.
//! 3. On success, write the result to the cache and return it. On failure,
//!    return the operation's default value. Nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use super::llm_chat::{DEFAULT_HOSTED_MODEL, LlmCompletionClient};
use super::rate_limit::RateLimiter;
use super::record_remote_call;
use super::traits::{CompletionClient, CompletionRequest};
use crate::cache::{AnalysisCache, importance_content};
use crate::types::{BackendConfig, Importance, Operation};
use crate::{AnalysisError, Result};

/// Summary returned when the completion fails.
pub const SUMMARY_ERROR: &str = "Error generating summary";

/// Reply returned when the completion fails.
pub const RESPONSE_ERROR: &str = "Error generating response";

const BACKEND_NAME: &str = "hosted";

const SUMMARY_SYSTEM: &str =
    "You are an AI assistant that summarizes emails concisely and professionally.";

const RESPONSE_SYSTEM: &str = "You are an AI assistant that helps draft professional email \
     responses. Keep responses concise, professional, and appropriate for business communication.";

const IMPORTANCE_SYSTEM: &str = "You are an AI assistant that analyzes email importance. \
     Respond only with \"high\" or \"low\". Consider factors like urgency, sender role, \
     deadlines, and critical business impact.";

/// Hosted-provider backend.
pub struct HostedBackend {
    client: Arc<dyn CompletionClient>,
    cache: Arc<AnalysisCache>,
    limiter: Arc<RateLimiter>,
}

impl HostedBackend {
    /// Build the backend from configuration.
    ///
    /// Fails immediately with [`AnalysisError::Configuration`] when no
    /// credential is configured.
    pub fn new(
        config: &BackendConfig,
        cache: Arc<AnalysisCache>,
        limiter: Arc<RateLimiter>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Self::client_from_config(config)?.timeout_secs(timeout_secs);
        Ok(Self::with_client(Arc::new(client), cache, limiter))
    }

    /// Build the backend around an existing completion client.
    pub fn with_client(
        client: Arc<dyn CompletionClient>,
        cache: Arc<AnalysisCache>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            cache,
            limiter,
        }
    }

    /// Validate the configuration and create the production client.
    pub(crate) fn client_from_config(config: &BackendConfig) -> Result<LlmCompletionClient> {
        if !config.has_credential() {
            return Err(AnalysisError::Configuration(
                "hosted provider requires a credential".to_string(),
            ));
        }
        let credential = config.credential.as_deref().unwrap_or_default();
        let model = config
            .model_name
            .as_deref()
            .unwrap_or(DEFAULT_HOSTED_MODEL);

        let mut client = LlmCompletionClient::new(credential, model);
        if let Some(ref endpoint) = config.endpoint {
            client = client.base_url(endpoint.clone());
        }
        Ok(client)
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub async fn summarize(&self, content: &str) -> String {
        if let Some(cached) = self.cache.get(Operation::Summary, content).await {
            return cached;
        }

        let request = CompletionRequest {
            system: SUMMARY_SYSTEM.to_string(),
            prompt: format!("Please provide a brief summary of this email: {content}"),
            max_tokens: 150,
            temperature: 0.3,
        };
        match self.complete(Operation::Summary, &request).await {
            Ok(summary) => {
                self.cache.set(Operation::Summary, content, summary.as_str()).await;
                summary
            }
            Err(e) => {
                warn!(operation = "summary", error = %e, "hosted completion failed");
                SUMMARY_ERROR.to_string()
            }
        }
    }

    pub async fn draft_response(&self, content: &str) -> String {
        if let Some(cached) = self.cache.get(Operation::Response, content).await {
            return cached;
        }

        let request = CompletionRequest {
            system: RESPONSE_SYSTEM.to_string(),
            prompt: format!("Please suggest a professional response to this email: {content}"),
            max_tokens: 200,
            temperature: 0.7,
        };
        match self.complete(Operation::Response, &request).await {
            Ok(reply) => {
                self.cache.set(Operation::Response, content, reply.as_str()).await;
                reply
            }
            Err(e) => {
                warn!(operation = "response", error = %e, "hosted completion failed");
                RESPONSE_ERROR.to_string()
            }
        }
    }

    /// Classify via the provider, parsing its answer strictly.
    ///
    /// Only recognized labels are cached; anything else yields
    /// [`Importance::Low`] and will be asked again next time.
    pub async fn classify_importance(&self, subject: &str, content: &str) -> Importance {
        let key = importance_content(subject, content);
        if let Some(cached) = self.cache.get(Operation::Importance, &key).await {
            return Importance::parse_label(&cached).unwrap_or(Importance::Low);
        }

        let request = CompletionRequest {
            system: IMPORTANCE_SYSTEM.to_string(),
            prompt: format!(
                "Please analyze the importance of this email.\nSubject: {subject}\n\
                 Content: {content}\nRespond only with \"high\" or \"low\"."
            ),
            max_tokens: 10,
            temperature: 0.1,
        };
        let text = match self.complete(Operation::Importance, &request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(operation = "importance", error = %e, "hosted completion failed");
                return Importance::Low;
            }
        };

        match Importance::parse_label(&text) {
            Some(importance) => {
                self.cache
                    .set(Operation::Importance, &key, importance.as_str())
                    .await;
                importance
            }
            None => {
                warn!(label = %text.trim(), "hosted provider returned an unrecognized importance label");
                Importance::Low
            }
        }
    }

    async fn complete(&self, operation: Operation, request: &CompletionRequest) -> Result<String> {
        let client = &self.client;
        self.limiter
            .run_gated(|| async move {
                let start = Instant::now();
                let result = client.complete(request).await;
                record_remote_call(BACKEND_NAME, operation, result.is_ok(), start.elapsed());
                result
            })
            .await
            .map(|text| text.trim().to_string())
    }
}
