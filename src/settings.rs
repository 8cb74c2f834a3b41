//! Configuration loading.
//!
//! Settings are loaded from TOML with the following resolution order:
//! 1. explicit path (e.g. `--config <path>`), which must exist
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//! 4. built-in defaults
//!
//! The backend choice itself (provider, credential, endpoint, model) is not
//! part of these settings; it lives in the key-value store so that it can
//! change between calls.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_TTL};
use crate::gateway::{AnalyzerBuilder, DEFAULT_TIMEOUT_SECS};
use crate::providers::RateLimitConfig;
use crate::store::default_store_path;
use crate::types::{BackendConfig, ProviderKind};
use crate::{AnalysisError, Result};

/// Environment variables consulted, in order, for a hosted credential.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["HUGINN_API_KEY", "OPENAI_API_KEY"];

/// Process settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Where the key-value store lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// Path of the JSON store (default: `<data dir>/huginn/store.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

/// Analysis cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds (default: 86400).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

/// Admission policy for the hosted provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests per window (default: 20).
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Window length in seconds (default: 60).
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Pause between checks of a full window, in milliseconds (default: 3000).
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_requests() -> usize {
    20
}

fn default_window_secs() -> u64 {
    60
}

fn default_retry_delay_ms() -> u64 {
    3_000
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Settings {
    /// Load settings from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            AnalysisError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the settings file path; `None` means use defaults.
    fn resolve_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(AnalysisError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().ttl(Duration::from_secs(self.cache.ttl_secs))
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig::new()
            .max_requests(self.rate_limit.max_requests)
            .window(Duration::from_secs(self.rate_limit.window_secs))
            .retry_delay(Duration::from_millis(self.rate_limit.retry_delay_ms))
    }

    /// An analyzer builder with these settings applied, backed by the JSON
    /// file store.
    pub fn analyzer_builder(&self) -> AnalyzerBuilder {
        AnalyzerBuilder::new()
            .store_path(self.storage.resolved_path())
            .cache_config(self.cache_config())
            .rate_limit(self.rate_limit_config())
            .timeout(self.http.timeout_secs)
    }
}

/// Fill in a missing hosted credential from the environment.
///
/// Only applies to the hosted provider; other configs are returned as-is.
pub fn with_env_credential(config: BackendConfig) -> BackendConfig {
    with_credential_from(config, |name| std::env::var(name).ok())
}

fn with_credential_from(
    mut config: BackendConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BackendConfig {
    if config.kind() != Some(ProviderKind::Hosted) || config.has_credential() {
        return config;
    }
    config.credential = CREDENTIAL_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()));
    config
}
