//! Layered configuration. Every section defaults field-by-field, so an empty
//! TOML document yields a fully usable config.

pub mod defaults;
mod observability_config;
mod remote_config;
mod storage_config;
mod sync_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{OutboxError, OutboxResult};

pub use observability_config::ObservabilityConfig;
pub use remote_config::RemoteSettings;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;

/// Root configuration for the outbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboxConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub remote: RemoteSettings,
    pub observability: ObservabilityConfig,
}

impl OutboxConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml(source: &str) -> OutboxResult<Self> {
        toml::from_str(source).map_err(|e| OutboxError::ConfigError {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> OutboxResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| OutboxError::ConfigError {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&source)
    }
}
