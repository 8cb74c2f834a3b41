//! Analyzer - the orchestration entry point

use std::sync::Arc;

use futures_util::future::try_join3;
use tracing::{instrument, warn};

use super::AnalyzerBuilder;
use super::selector::BackendSelector;
use crate::cache::AnalysisCache;
use crate::providers::RateLimiter;
use crate::store::{KeyValueStore, load_backend_config, save_backend_config};
use crate::telemetry;
use crate::types::{AnalysisRequest, AnalysisResult, BackendConfig};
use crate::Result;

/// Runs the three analysis operations for an email against the backend
/// named by the configuration.
///
/// Owns the process-wide cache and rate limiter; every backend selected
/// through this analyzer shares them.
pub struct Analyzer {
    selector: BackendSelector,
    cache: Arc<AnalysisCache>,
    limiter: Arc<RateLimiter>,
    store: Arc<dyn KeyValueStore>,
}

impl Analyzer {
    pub(crate) fn new(
        selector: BackendSelector,
        cache: Arc<AnalysisCache>,
        limiter: Arc<RateLimiter>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            selector,
            cache,
            limiter,
            store,
        }
    }

    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Analyze one email.
    ///
    /// Summary, importance and reply are produced concurrently by the same
    /// backend. Fails only if the backend cannot be constructed (e.g. a
    /// hosted configuration without credential) or an operation raises an
    /// error it did not absorb itself.
    #[instrument(name = "huginn.analyze", skip_all, fields(provider = %config.provider))]
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        config: &BackendConfig,
    ) -> Result<AnalysisResult> {
        let backend = self.selector.select(config).inspect_err(|e| {
            warn!(error = %e, "backend construction failed");
            metrics::counter!(telemetry::ANALYSES_TOTAL, "backend" => "none", "status" => "error")
                .increment(1);
        })?;

        let outcome = try_join3(
            backend.summarize(&request.body),
            backend.classify_importance(&request.subject, &request.body),
            backend.draft_response(&request.body),
        )
        .await;

        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::ANALYSES_TOTAL, "backend" => backend.name(), "status" => status)
            .increment(1);

        let (summary, importance, suggested_response) = outcome?;
        Ok(AnalysisResult {
            summary,
            importance,
            suggested_response,
        })
    }

    /// Analyze one email with the configuration currently in the store.
    ///
    /// The configuration is re-read on every call so that changes take
    /// effect immediately.
    pub async fn analyze_stored(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let config = self.stored_config().await;
        self.analyze(request, &config).await
    }

    /// The configuration [`analyze_stored`](Self::analyze_stored) would use.
    pub async fn stored_config(&self) -> BackendConfig {
        load_backend_config(self.store.as_ref()).await
    }

    /// Persist a new backend configuration.
    pub async fn save_config(&self, config: &BackendConfig) -> Result<()> {
        save_backend_config(self.store.as_ref(), config).await
    }

    /// Drop every cached analysis result.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }
}
