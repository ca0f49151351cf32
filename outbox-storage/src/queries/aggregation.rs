//! Queue-wide aggregates for status reporting.
//!
//! Computed over decoded records so the count always matches what a
//! listing returns.

use chrono::{DateTime, Utc};

use outbox_core::mutation::QueuedMutation;

/// Number of queued mutations and the enqueue time of the oldest one.
pub fn pending_summary(pending: &[QueuedMutation]) -> (usize, Option<DateTime<Utc>>) {
    let oldest = pending.iter().map(|m| m.timestamp).min();
    (pending.len(), oldest)
}
