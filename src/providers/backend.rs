//! The closed set of analysis backends.

use super::hosted::HostedBackend;
use super::local::LocalBackend;
use super::open::OpenBackend;
use crate::types::{Importance, ProviderKind};
use crate::Result;

/// An analysis backend, dispatched by variant.
///
/// All three operations return `Result` so that a backend can surface an
/// unexpected failure; the current variants absorb remote failures into
/// default values and always return `Ok`.
pub enum Backend {
    Local(LocalBackend),
    OpenBackend(OpenBackend),
    Hosted(HostedBackend),
}

impl Backend {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Backend::Local(_) => ProviderKind::Local,
            Backend::OpenBackend(_) => ProviderKind::OpenBackend,
            Backend::Hosted(_) => ProviderKind::Hosted,
        }
    }

    /// Name used in logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Local(_) => "local",
            Backend::OpenBackend(_) => "open_backend",
            Backend::Hosted(_) => "hosted",
        }
    }

    pub async fn summarize(&self, content: &str) -> Result<String> {
        Ok(match self {
            Backend::Local(b) => b.summarize(content),
            Backend::OpenBackend(b) => b.summarize(content).await,
            Backend::Hosted(b) => b.summarize(content).await,
        })
    }

    pub async fn classify_importance(&self, subject: &str, content: &str) -> Result<Importance> {
        Ok(match self {
            Backend::Local(b) => b.classify_importance(subject, content),
            Backend::OpenBackend(b) => b.classify_importance(subject, content).await,
            Backend::Hosted(b) => b.classify_importance(subject, content).await,
        })
    }

    /// Draft a reply. `None` means the backend declined to draft one.
    pub async fn draft_response(&self, content: &str) -> Result<Option<String>> {
        Ok(Some(match self {
            Backend::Local(b) => b.draft_response(content),
            Backend::OpenBackend(b) => b.draft_response(content).await,
            Backend::Hosted(b) => b.draft_response(content).await,
        }))
    }
}

impl From<LocalBackend> for Backend {
    fn from(backend: LocalBackend) -> Self {
        Backend::Local(backend)
    }
}

impl From<OpenBackend> for Backend {
    fn from(backend: OpenBackend) -> Self {
        Backend::OpenBackend(backend)
    }
}

impl From<HostedBackend> for Backend {
    fn from(backend: HostedBackend) -> Self {
        Backend::Hosted(backend)
    }
}
