use async_trait::async_trait;

use crate::errors::OutboxResult;
use crate::models::RemoteConfig;
use crate::mutation::QueuedMutation;

/// Performs the network replay of one queued mutation on behalf of the
/// background agent. Supplied by the host application.
#[async_trait]
pub trait IMutationReplayer: Send + Sync {
    async fn replay(&self, mutation: &QueuedMutation, remote: &RemoteConfig) -> OutboxResult<()>;
}
