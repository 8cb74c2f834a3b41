//! Flat key-value persistence.
//!
//! Huginn persists two root keys: [`CACHE_KEY`] holds the analysis cache
//! table and [`CONFIG_KEY`] holds the active [`BackendConfig`](crate::BackendConfig).
//! Values are plain JSON; there is no schema versioning.
//!
//! Two implementations are provided:
//!
//! - [`JsonFileStore`]: a single JSON document on disk, rewritten
//!   atomically (tmp file + rename) on every `set`.
//! - [`MemoryStore`]: process-local, for tests and ephemeral use.

mod config;

pub use config::{
    load_backend_config, read_backend_config, require_hosted_credential, save_backend_config,
};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{AnalysisError, Result};

/// Root key holding the analysis cache table.
pub const CACHE_KEY: &str = "analysis_cache";

/// Root key holding the active backend configuration.
pub const CONFIG_KEY: &str = "backend_config";

/// Minimal async key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a root key. `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write (or overwrite) a root key.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by one JSON document on disk.
///
/// The whole document is read and rewritten on each `set`; a mutex keeps
/// concurrent writers within this process from interleaving. A document
/// that no longer parses makes `get` fail until the next `set`, which
/// starts over from an empty document.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file content, or `None` when the file does not exist yet.
    async fn read_text(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AnalysisError::Persistence(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn read_document(&self) -> Result<Map<String, Value>> {
        let Some(content) = self.read_text().await? else {
            return Ok(Map::new());
        };
        serde_json::from_str(&content).map_err(|e| {
            AnalysisError::Persistence(format!("corrupt store {}: {e}", self.path.display()))
        })
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AnalysisError::Persistence(format!(
                    "failed to create store dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            AnalysisError::Persistence(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AnalysisError::Persistence(format!(
                "failed to rename {} → {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        // A corrupt document is replaced on write.
        let mut document = match self.read_text().await? {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "store is corrupt, starting over");
                Map::new()
            }),
            None => Map::new(),
        };
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }
}

/// Default on-disk location: `<data dir>/huginn/store.json`.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("huginn")
        .join("store.json")
}
