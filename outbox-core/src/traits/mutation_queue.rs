use async_trait::async_trait;

use crate::errors::OutboxResult;
use crate::models::QueueStatus;
use crate::mutation::{NewMutation, QueuedMutation};

/// Durable queue of pending mutations plus the retry controller and the
/// process-wide sync flags layered on it.
#[async_trait]
pub trait IMutationQueue: Send + Sync {
    // --- Enqueue ---
    /// Insert a mutation, or return the stored record that already carries
    /// the same signature.
    async fn queue_mutation(&self, mutation: NewMutation) -> OutboxResult<QueuedMutation>;

    // --- Reads ---
    async fn get_mutation(&self, id: &str) -> OutboxResult<Option<QueuedMutation>>;
    /// All users' mutations, oldest first.
    async fn get_pending_mutations(&self) -> OutboxResult<Vec<QueuedMutation>>;
    async fn get_mutations_by_type(&self, mutation_type: &str)
        -> OutboxResult<Vec<QueuedMutation>>;
    async fn get_user_mutations(&self, user_id: &str) -> OutboxResult<Vec<QueuedMutation>>;

    // --- Removal ---
    /// Unknown ids are a no-op.
    async fn remove_mutation(&self, id: &str) -> OutboxResult<()>;
    /// Returns the number of records deleted.
    async fn clear_user_mutations(&self, user_id: &str) -> OutboxResult<usize>;

    // --- Retry ---
    /// `true` while retries remain; `false` for unknown ids and on exhaustion
    /// (the record is deleted).
    async fn increment_retry_count(&self, id: &str) -> OutboxResult<bool>;

    // --- Status ---
    async fn get_queue_status(&self) -> OutboxResult<QueueStatus>;
    fn set_syncing_state(&self, is_syncing: bool, success: Option<bool>);
}
