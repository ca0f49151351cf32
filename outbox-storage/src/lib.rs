//! # outbox-storage
//!
//! Durable mutation queue on SQLite: a single serialized writer, a read pool
//! for file-backed databases, versioned migrations, unique-signature dedup,
//! and the bounded retry controller. The process-wide sync flags live next to
//! the store but are never persisted.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod sync_activity;

pub use engine::QueueStorage;
pub use queries::retry_ops::RetryOutcome;
pub use sync_activity::SyncActivity;

use outbox_core::errors::{OutboxError, StorageError};

/// Wrap a SQLite-level failure message in the workspace error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> OutboxError {
    OutboxError::StorageError(StorageError::SqliteError {
        message: message.into(),
    })
}
