//! Client for a self-hosted open model behind a plain HTTP endpoint.
//!
//! The endpoint takes `{"model": "...", "prompt": "...", "stream": false}`
//! and answers with one JSON body carrying a `response` field, which is what
//! Ollama's `/api/generate` returns when streaming is off.
//!
//! Every operation degrades to a fixed default on failure. There is no
//! retry, no cache and no admission control on this path.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::record_remote_call;
use crate::types::{Importance, Operation};
use crate::{AnalysisError, Result};

/// Endpoint used when the configuration names none.
pub const DEFAULT_OPEN_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Model requested when the configuration names none.
pub const DEFAULT_OPEN_MODEL: &str = "llama3";

/// Summary returned when the endpoint fails.
pub const SUMMARY_FALLBACK: &str = "Unable to generate summary";

/// Reply returned when the endpoint fails.
pub const RESPONSE_FALLBACK: &str = "Thank you for your email. I will review and respond soon.";

const BACKEND_NAME: &str = "open_backend";

/// Open-model HTTP backend.
#[derive(Clone)]
pub struct OpenBackend {
    http: Client,
    endpoint: String,
    model: String,
}

impl OpenBackend {
    /// Create a backend with its own HTTP client (60s timeout).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AnalysisError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, endpoint))
    }

    /// Create a backend sharing an existing HTTP client.
    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            model: DEFAULT_OPEN_MODEL.to_string(),
        }
    }

    /// Name the model the endpoint should run. `None` keeps
    /// [`DEFAULT_OPEN_MODEL`].
    pub fn model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a prompt and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| AnalysisError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: format!("open backend error: {status}"),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Http(e.to_string()))?;

        if body.response.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(body.response)
    }

    pub async fn summarize(&self, content: &str) -> String {
        let prompt = format!("Summarize this email concisely: {content}");
        self.generate_or(Operation::Summary, &prompt, SUMMARY_FALLBACK)
            .await
    }

    pub async fn draft_response(&self, content: &str) -> String {
        let prompt = format!("Generate a professional response to this email: {content}");
        self.generate_or(Operation::Response, &prompt, RESPONSE_FALLBACK)
            .await
    }

    /// Ask the endpoint for `high` or `low`.
    ///
    /// Anything other than those two labels (after trimming and
    /// lower-casing) is logged and treated as [`Importance::Low`].
    pub async fn classify_importance(&self, subject: &str, content: &str) -> Importance {
        let prompt = format!(
            "Analyze if this email is urgent.\nSubject: {subject}\nContent: {content}\n\
             Respond only with \"high\" or \"low\"."
        );
        let text = match self.timed_generate(Operation::Importance, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(operation = "importance", error = %e, "open backend failed, defaulting to low");
                return Importance::Low;
            }
        };
        Importance::parse_label(&text).unwrap_or_else(|| {
            warn!(label = %text.trim(), "open backend returned an unrecognized importance label");
            Importance::Low
        })
    }

    async fn generate_or(&self, operation: Operation, prompt: &str, fallback: &str) -> String {
        match self.timed_generate(operation, prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(%operation, error = %e, "open backend failed, using fallback");
                fallback.to_string()
            }
        }
    }

    async fn timed_generate(&self, operation: Operation, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.generate(prompt).await;
        record_remote_call(BACKEND_NAME, operation, result.is_ok(), start.elapsed());
        result
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}
