use serde::{Deserialize, Serialize};

use crate::models::RemoteConfig;

/// Remote endpoint settings. All optional: without a URL the orchestrator
/// never hands credentials to the background agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
}

impl RemoteSettings {
    /// The agent handoff payload, if a URL and key are both configured.
    pub fn to_remote_config(&self) -> Option<RemoteConfig> {
        match (&self.url, &self.anon_key) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig {
                url: url.clone(),
                anon_key: anon_key.clone(),
                access_token: self.access_token.clone(),
            }),
            _ => None,
        }
    }
}
