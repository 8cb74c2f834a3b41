//! Backend selection from configuration.

use std::sync::Arc;

use tracing::warn;

use crate::cache::AnalysisCache;
use crate::providers::open::DEFAULT_OPEN_ENDPOINT;
use crate::providers::{
    Backend, CompletionClient, HostedBackend, LocalBackend, OpenBackend, RateLimiter,
};
use crate::types::{BackendConfig, ProviderKind};
use crate::Result;

/// Chooses and constructs a [`Backend`] for each orchestration call.
///
/// Holds the shared pieces every backend may need (cache, rate limiter,
/// HTTP client) so that selection itself does no I/O and never suspends.
pub struct BackendSelector {
    cache: Arc<AnalysisCache>,
    limiter: Arc<RateLimiter>,
    http: reqwest::Client,
    timeout_secs: u64,
    /// Replaces the production hosted client when set (tests, proxies).
    completion_client: Option<Arc<dyn CompletionClient>>,
}

impl BackendSelector {
    pub fn new(
        cache: Arc<AnalysisCache>,
        limiter: Arc<RateLimiter>,
        http: reqwest::Client,
        timeout_secs: u64,
    ) -> Self {
        Self {
            cache,
            limiter,
            http,
            timeout_secs,
            completion_client: None,
        }
    }

    /// Use `client` for the hosted backend instead of building one from the
    /// configuration. The credential is still required.
    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion_client = Some(client);
        self
    }

    /// Resolve the provider kind, falling back to local for unknown names.
    pub fn resolve_kind(config: &BackendConfig) -> ProviderKind {
        config.kind().unwrap_or_else(|| {
            warn!(
                provider = %config.provider,
                "unknown provider, falling back to local"
            );
            ProviderKind::Local
        })
    }

    /// Construct the backend named by `config`.
    ///
    /// Only a hosted configuration without a credential fails; an unknown
    /// provider kind yields the local backend.
    pub fn select(&self, config: &BackendConfig) -> Result<Backend> {
        let backend = match Self::resolve_kind(config) {
            ProviderKind::Local => LocalBackend::new().into(),
            ProviderKind::OpenBackend => {
                let endpoint = config
                    .endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_OPEN_ENDPOINT);
                OpenBackend::with_client(self.http.clone(), endpoint)
                    .model(config.model_name.clone())
                    .into()
            }
            ProviderKind::Hosted => {
                let production = HostedBackend::client_from_config(config)?;
                let client: Arc<dyn CompletionClient> = match self.completion_client {
                    Some(ref client) => Arc::clone(client),
                    None => Arc::new(production.timeout_secs(self.timeout_secs)),
                };
                HostedBackend::with_client(client, self.cache.clone(), self.limiter.clone())
                    .into()
            }
        };
        Ok(backend)
    }
}
