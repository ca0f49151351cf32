//! Messages exchanged with the background agent. The two sides share no
//! memory, so every message is a self-contained value with a stable JSON form.

use serde::{Deserialize, Serialize};

use outbox_core::errors::OutboxResult;
use outbox_core::models::RemoteConfig;

/// Foreground → agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentMessage {
    /// Drain the queue now.
    ManualSync,
    /// Credentials for replaying against the remote API.
    SetSupabaseConfig(RemoteConfig),
    /// Platform-scheduled sync for a registered tag.
    BackgroundSync { tag: String },
}

/// Agent → foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentEvent {
    SyncComplete {
        /// Every pending record replayed.
        success: bool,
        #[serde(rename = "syncedCount")]
        synced_count: usize,
    },
}

impl AgentMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ManualSync => "MANUAL_SYNC",
            Self::SetSupabaseConfig(_) => "SET_SUPABASE_CONFIG",
            Self::BackgroundSync { .. } => "BACKGROUND_SYNC",
        }
    }

    pub fn to_json(&self) -> OutboxResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> OutboxResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl AgentEvent {
    pub fn to_json(&self) -> OutboxResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> OutboxResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
