/// Outbox system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Retry bound stamped on every newly queued mutation.
pub const MAX_RETRIES: u32 = 5;

/// Tag under which queue replay is registered with the background scheduler.
pub const SYNC_TAG: &str = "sync-mutations";
