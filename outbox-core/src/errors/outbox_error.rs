use super::{RemoteError, StorageError, SyncError};

/// Top-level error for every outbox operation.
///
/// Subsystem errors convert in via `From`, so `?` works across crate
/// boundaries. A mutation deferred into the queue is never an error; it is
/// reported as a successful outcome by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("sync error: {0}")]
    SyncError(#[from] SyncError),

    #[error("remote error: {0}")]
    RemoteError(#[from] RemoteError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {reason}")]
    ConfigError { reason: String },

    #[error("invalid mutation action: {value}")]
    InvalidAction { value: String },
}

impl OutboxError {
    /// Whether this error came back from the remote endpoint (as opposed to
    /// a local storage or channel failure).
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteError(_))
    }
}
