/// Errors crossing the foreground / background agent boundary.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("no background agent is registered")]
    AgentUnavailable,

    #[error("agent channel closed: {reason}")]
    ChannelClosed { reason: String },

    #[error("remote config has not been handed to the agent")]
    MissingRemoteConfig,
}
