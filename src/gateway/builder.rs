//! Builder for configuring analyzer instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{Analyzer, BackendSelector};
use crate::cache::{AnalysisCache, CacheConfig, Clock, SystemClock};
use crate::providers::{CompletionClient, RateLimitConfig, RateLimiter};
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::{AnalysisError, Result};

/// Default timeout for remote backend requests (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Builder for configuring analyzer instances.
pub struct AnalyzerBuilder {
    store: Option<Arc<dyn KeyValueStore>>,
    cache_config: CacheConfig,
    rate_limit: RateLimitConfig,
    clock: Option<Arc<dyn Clock>>,
    timeout_secs: Option<u64>,
    completion_client: Option<Arc<dyn CompletionClient>>,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            cache_config: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            clock: None,
            timeout_secs: None,
            completion_client: None,
        }
    }

    /// Persist cache and configuration in `store`.
    ///
    /// Without a store, the analyzer keeps everything in memory.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persist cache and configuration in a JSON file at `path`.
    pub fn store_path(self, path: impl Into<PathBuf>) -> Self {
        self.store(Arc::new(JsonFileStore::new(path)))
    }

    /// Configure the analysis cache (TTL).
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Configure the admission policy applied to hosted calls.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Clock used to stamp and expire cache entries.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the timeout for remote backend requests (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Route hosted completions through `client` instead of the built-in
    /// `llm` client.
    pub fn completion_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion_client = Some(client);
        self
    }

    /// Build the analyzer, hydrating the cache from the store.
    pub async fn build(self) -> Result<Analyzer> {
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AnalysisError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        let cache = Arc::new(AnalysisCache::load(store.clone(), &self.cache_config, clock).await);
        let limiter = Arc::new(RateLimiter::new(self.rate_limit));

        let mut selector =
            BackendSelector::new(cache.clone(), limiter.clone(), http, timeout_secs);
        if let Some(client) = self.completion_client {
            selector = selector.completion_client(client);
        }

        Ok(Analyzer::new(selector, cache, limiter, store))
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
