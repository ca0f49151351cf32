use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate view of the queue for display. Derived on every read, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub pending_count: usize,
    /// Enqueue time of the oldest pending mutation.
    pub oldest_mutation: Option<DateTime<Utc>>,
    /// Process-local flag; resets to false on restart.
    pub is_syncing: bool,
    pub last_sync_attempt: Option<DateTime<Utc>>,
    pub last_sync_success: Option<DateTime<Utc>>,
}

impl QueueStatus {
    pub fn is_empty(&self) -> bool {
        self.pending_count == 0
    }
}
