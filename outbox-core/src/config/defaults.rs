// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "outbox.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Sync ---
pub const DEFAULT_BACKGROUND_SYNC_ENABLED: bool = true;
pub const DEFAULT_STATUS_REFRESH_INTERVAL_MS: u64 = 5_000; // 5 seconds
pub const DEFAULT_AGENT_CHANNEL_CAPACITY: usize = 64;
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 32;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
