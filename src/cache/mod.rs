//! Persistent TTL cache for analysis results.
//!
//! [`AnalysisCache`] remembers what the hosted backend answered for a given
//! operation and input so that re-opening the same email does not cost
//! another remote call.
//!
//! # Keying
//!
//! Keys are `"<operation>:<content>"`. Operation names never contain `:`, so
//! the first colon always separates the two parts. For importance the
//! content is `subject + "\n" + body` (see [`importance_content`]), which
//! means a subject change alone invalidates the cached label.
//!
//! # Expiry
//!
//! Entries are stamped with wall-clock epoch milliseconds and live for the
//! configured TTL (24 hours by default). Expired entries are removed lazily
//! when a read finds them, and swept once when the table is hydrated from
//! the store.
//!
//! # Persistence
//!
//! Write-through: every mutation persists the full table under
//! [`CACHE_KEY`](crate::store::CACHE_KEY). Store failures are logged and
//! swallowed; the in-memory table stays authoritative for the rest of the
//! process.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::store::{CACHE_KEY, KeyValueStore};
use crate::telemetry;
use crate::types::Operation;

/// Default time-to-live for cached results: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the analysis cache.
///
/// ```rust
/// # use huginn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(3600));
/// assert_eq!(config.ttl, Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// One cached result, as persisted (`{"value", "createdAt"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub value: String,
    /// Epoch milliseconds at insertion.
    pub created_at: u64,
}

/// Composite cache key for an operation and its input.
pub fn cache_key(operation: Operation, content: &str) -> String {
    format!("{}:{}", operation.as_str(), content)
}

/// Cache content for an importance lookup.
///
/// Subjects are assumed to be single-line: a newline in the subject can make
/// two different (subject, body) pairs share a key.
pub fn importance_content(subject: &str, body: &str) -> String {
    format!("{subject}\n{body}")
}

/// Shared, persisted analysis cache.
pub struct AnalysisCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl AnalysisCache {
    /// Hydrate the cache from `store`, dropping anything already expired.
    ///
    /// A failed or malformed read starts the cache empty.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        config: &CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let entries: HashMap<String, CacheEntry> = match store.get(CACHE_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "stored analysis cache is malformed, starting empty");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to load analysis cache, starting empty");
                HashMap::new()
            }
        };

        let cache = Self {
            entries: Mutex::new(entries),
            store,
            ttl: config.ttl,
            clock,
        };
        cache.sweep().await;
        cache
    }

    /// Look up a cached value.
    ///
    /// An expired entry is deleted on the spot (and the table persisted), so
    /// a later read cannot resurrect it.
    pub async fn get(&self, operation: Operation, content: &str) -> Option<String> {
        let key = cache_key(operation, content);
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(&key) {
            Some(entry) if !self.is_expired(entry, now) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => operation.as_str())
                    .increment(1);
                debug!(%operation, "analysis cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => operation.as_str())
            .increment(1);
        if expired {
            debug!(%operation, "analysis cache entry expired");
            entries.remove(&key);
            self.persist(&entries).await;
        }
        None
    }

    /// Insert or overwrite a value, stamped with the current time.
    pub async fn set(&self, operation: Operation, content: &str, value: impl Into<String>) {
        let entry = CacheEntry {
            value: value.into(),
            created_at: self.clock.now_millis(),
        };
        let mut entries = self.entries.lock().await;
        entries.insert(cache_key(operation, content), entry);
        self.persist(&entries).await;
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await;
    }

    /// Number of entries held in memory (expired ones included until read).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, entry: &CacheEntry, now: u64) -> bool {
        now.saturating_sub(entry.created_at) > self.ttl.as_millis() as u64
    }

    async fn sweep(&self) {
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "swept expired analysis cache entries");
        }
    }

    async fn persist(&self, entries: &HashMap<String, CacheEntry>) {
        let value = match serde_json::to_value(entries) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "failed to serialize analysis cache");
                return;
            }
        };
        if let Err(e) = self.store.set(CACHE_KEY, value).await {
            warn!(error = %e, "failed to persist analysis cache");
        }
    }
}
