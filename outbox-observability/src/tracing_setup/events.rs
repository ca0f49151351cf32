//! Structured log events for queue and sync transitions.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a newly queued mutation.
pub fn mutation_queued(id: &str, mutation_type: &str, action: &str, user_id: &str) {
    tracing::info!(
        event = "mutation_queued",
        mutation_id = %id,
        mutation_type = %mutation_type,
        action = %action,
        user_id = %user_id,
        "mutation queued"
    );
}

/// Log an enqueue that collapsed onto an existing record.
pub fn mutation_deduplicated(existing_id: &str, signature: &str) {
    tracing::debug!(
        event = "mutation_deduplicated",
        mutation_id = %existing_id,
        signature = %signature,
        "duplicate mutation, returning existing record"
    );
}

/// Log a mutation removed from the queue.
pub fn mutation_removed(id: &str, existed: bool) {
    tracing::debug!(
        event = "mutation_removed",
        mutation_id = %id,
        existed = existed,
        "mutation removed"
    );
}

/// Log a failed replay that will be retried.
pub fn retry_scheduled(id: &str, retry_count: u32, max_retries: u32) {
    tracing::info!(
        event = "retry_scheduled",
        mutation_id = %id,
        retry_count = retry_count,
        max_retries = max_retries,
        "mutation replay failed, will retry"
    );
}

/// Log a mutation dropped after its final failed attempt.
pub fn retries_exhausted(id: &str, retry_count: u32) {
    tracing::warn!(
        event = "retries_exhausted",
        mutation_id = %id,
        retry_count = retry_count,
        "retries exhausted, mutation dropped"
    );
}

/// Log a per-user queue wipe.
pub fn user_queue_cleared(user_id: &str, removed: usize) {
    tracing::info!(
        event = "user_queue_cleared",
        user_id = %user_id,
        removed = removed,
        "user mutations cleared"
    );
}

/// Log a row that could not be decoded and was skipped.
pub fn record_skipped(id: &str, reason: &str) {
    tracing::warn!(
        event = "record_skipped",
        mutation_id = %id,
        reason = %reason,
        "skipping undecodable queue record"
    );
}

/// Log a request for background processing.
pub fn sync_requested(tag: &str, kind: &str) {
    tracing::info!(
        event = "sync_requested",
        tag = %tag,
        kind = %kind,
        "sync requested"
    );
}

/// Log a completed drain.
pub fn sync_completed(success: bool, synced_count: usize) {
    tracing::info!(
        event = "sync_completed",
        success = success,
        synced_count = synced_count,
        "sync completed"
    );
}

/// Log an online/offline transition.
pub fn connectivity_changed(online: bool) {
    if online {
        tracing::info!(event = "connectivity_changed", online = true, "back online");
    } else {
        tracing::warn!(event = "connectivity_changed", online = false, "went offline");
    }
}
