//! Huginn error types

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    // Remote backend errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from backend")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    /// Backend could not be constructed from its configuration (e.g. the
    /// hosted provider without a credential). The only error `analyze`
    /// surfaces to callers in normal operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    // Storage errors
    #[error("persistence error: {0}")]
    Persistence(String),

    // Wrapped llm crate error
    #[error("LLM error: {0}")]
    Llm(String),
}

impl AnalysisError {
    /// Whether this error comes from backend construction rather than from
    /// a remote call or storage.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }
}

impl From<llm::error::LLMError> for AnalysisError {
    fn from(err: llm::error::LLMError) -> Self {
        let msg = err.to_string();
        if msg.contains("401") || msg.contains("invalid api key") {
            AnalysisError::Api {
                status: 401,
                message: msg,
            }
        } else if msg.contains("429") || msg.contains("rate limit") {
            AnalysisError::Api {
                status: 429,
                message: msg,
            }
        } else {
            AnalysisError::Llm(msg)
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
