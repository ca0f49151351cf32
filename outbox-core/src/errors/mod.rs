mod outbox_error;
mod remote_error;
mod storage_error;
mod sync_error;

pub use outbox_error::OutboxError;
pub use remote_error::RemoteError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;

/// Convenience alias used across the workspace.
pub type OutboxResult<T> = Result<T, OutboxError>;
