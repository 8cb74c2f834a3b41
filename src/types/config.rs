//! Backend configuration types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which analysis backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Rule-based, no I/O.
    Local,
    /// Self-hosted model behind a plain "prompt in, text out" HTTP endpoint.
    OpenBackend,
    /// Hosted chat-completion provider (cached and rate limited).
    Hosted,
}

impl ProviderKind {
    /// Parse a provider name case-insensitively.
    ///
    /// Returns `None` for unknown names; the selector decides what to do
    /// with those.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "local" => Some(ProviderKind::Local),
            "opensource" | "open" | "open_backend" | "open-backend" => {
                Some(ProviderKind::OpenBackend)
            }
            "openai" | "hosted" => Some(ProviderKind::Hosted),
            _ => None,
        }
    }

    /// Canonical name, as written back to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::OpenBackend => "opensource",
            ProviderKind::Hosted => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend configuration as stored by the caller.
///
/// `provider` is kept as free text so that unknown values survive a
/// round-trip through storage and reach the selector's fallback.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl BackendConfig {
    /// Config for the given provider name with nothing else set.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            credential: None,
            endpoint: None,
            model_name: None,
        }
    }

    /// Config for the local rule-based backend.
    pub fn local() -> Self {
        Self::new(ProviderKind::Local.as_str())
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn model_name(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    /// Parsed provider kind, `None` if the name is unknown.
    pub fn kind(&self) -> Option<ProviderKind> {
        ProviderKind::parse(&self.provider)
    }

    /// Whether a non-blank credential is present.
    pub fn has_credential(&self) -> bool {
        self.credential
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::local()
    }
}

// Credentials stay out of logs.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("model_name", &self.model_name)
            .finish()
    }
}
