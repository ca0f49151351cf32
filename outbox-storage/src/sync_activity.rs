//! Process-wide sync flags. Kept in memory only, so a restart always comes
//! back with `is_syncing = false`.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub is_syncing: bool,
    pub last_sync_attempt: Option<DateTime<Utc>>,
    pub last_sync_success: Option<DateTime<Utc>>,
}

/// Shared `is_syncing` flag plus the last attempt / success stamps.
#[derive(Debug, Default)]
pub struct SyncActivity {
    state: RwLock<SyncSnapshot>,
}

impl SyncActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting a sync stamps the attempt time. `Some(true)` stamps the
    /// success time; `Some(false)` keeps the previous success stamp.
    pub fn set(&self, is_syncing: bool, success: Option<bool>) {
        let now = Utc::now();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.is_syncing = is_syncing;
        if is_syncing {
            state.last_sync_attempt = Some(now);
        }
        if success == Some(true) {
            state.last_sync_success = Some(now);
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}
