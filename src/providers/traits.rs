//! Seam between the hosted backend and the chat-completion client.
//!
//! The hosted backend owns the caching and admission policy; the actual
//! completion call goes through [`CompletionClient`] so the transport can be
//! swapped (the `llm` crate in production, scripted mocks in tests).

use async_trait::async_trait;

use crate::Result;

/// One single-turn chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User message carrying the task-specific prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Chat-completion transport.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Run the completion and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
