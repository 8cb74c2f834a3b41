//! Persisted backend configuration.

use tracing::{debug, warn};

use super::{CONFIG_KEY, KeyValueStore};
use crate::types::{BackendConfig, ProviderKind};
use crate::Result;

/// Load the active backend configuration.
///
/// Never fails: a missing key, a read failure, or an unparseable value all
/// yield the default (local) configuration. A hosted configuration without
/// a credential is reset to local as well, so that a half-configured hosted
/// provider is never handed to the selector from storage.
pub async fn load_backend_config(store: &dyn KeyValueStore) -> BackendConfig {
    require_hosted_credential(read_backend_config(store).await)
}

/// Read the stored configuration as written, without the credential check
/// applied by [`load_backend_config`].
///
/// Callers that supply a credential from elsewhere (e.g. the environment)
/// read with this and validate afterwards.
pub async fn read_backend_config(store: &dyn KeyValueStore) -> BackendConfig {
    let value = match store.get(CONFIG_KEY).await {
        Ok(Some(v)) => v,
        Ok(None) => return BackendConfig::default(),
        Err(e) => {
            warn!(error = %e, "failed to read backend config, using local");
            return BackendConfig::default();
        }
    };

    match serde_json::from_value(value) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "stored backend config is malformed, using local");
            BackendConfig::default()
        }
    }
}

/// Reset a hosted configuration that has no credential to local.
pub fn require_hosted_credential(config: BackendConfig) -> BackendConfig {
    if config.kind() == Some(ProviderKind::Hosted) && !config.has_credential() {
        debug!("hosted provider stored without credential, using local");
        return BackendConfig::default();
    }
    config
}

/// Persist the backend configuration.
pub async fn save_backend_config(store: &dyn KeyValueStore, config: &BackendConfig) -> Result<()> {
    store.set(CONFIG_KEY, serde_json::to_value(config)?).await
}
