use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Replay and background-sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tag registered with the background scheduler after an offline enqueue.
    pub tag: String,
    /// Whether the platform offers background execution at all.
    pub background_sync_enabled: bool,
    /// Retry bound stamped on newly queued mutations.
    pub max_retries: u32,
    /// How often the orchestrator refreshes its queue status snapshot.
    pub status_refresh_interval_ms: u64,
    /// Capacity of the agent inbox.
    pub agent_channel_capacity: usize,
    /// Capacity of the completion broadcast channel.
    pub event_channel_capacity: usize,
    /// Cache keys invalidated after a sync that replayed anything.
    pub invalidate_on_complete: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tag: constants::SYNC_TAG.to_string(),
            background_sync_enabled: defaults::DEFAULT_BACKGROUND_SYNC_ENABLED,
            max_retries: constants::MAX_RETRIES,
            status_refresh_interval_ms: defaults::DEFAULT_STATUS_REFRESH_INTERVAL_MS,
            agent_channel_capacity: defaults::DEFAULT_AGENT_CHANNEL_CAPACITY,
            event_channel_capacity: defaults::DEFAULT_EVENT_CHANNEL_CAPACITY,
            invalidate_on_complete: Vec::new(),
        }
    }
}
