//! Background agent: an independent task that owns the remote credentials,
//! drains the queue on request, and reports each drain on the completion
//! channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::Instrument;

use outbox_core::errors::SyncError;
use outbox_core::models::RemoteConfig;
use outbox_core::traits::{IMutationQueue, IMutationReplayer};
use outbox_observability::{drain_span, events};

use crate::transport::{AgentEvent, AgentMessage};

/// Tally of one pass over the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
    /// The pass never reached the records.
    pub aborted: bool,
}

impl DrainReport {
    fn aborted() -> Self {
        Self {
            aborted: true,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed == 0 && self.synced == self.attempted
    }

    fn into_event(self) -> AgentEvent {
        AgentEvent::SyncComplete {
            success: self.is_success(),
            synced_count: self.synced,
        }
    }
}

pub struct BackgroundAgent {
    queue: Arc<dyn IMutationQueue>,
    replayer: Arc<dyn IMutationReplayer>,
    remote: Option<RemoteConfig>,
}

/// Running agent: its inbox and its task.
pub struct AgentHandle {
    sender: mpsc::Sender<AgentMessage>,
    task: JoinHandle<()>,
}

impl AgentHandle {
    pub fn sender(&self) -> mpsc::Sender<AgentMessage> {
        self.sender.clone()
    }

    /// Drop the handle's sender and wait for the agent to exit. The agent
    /// stops once every other sender clone is gone too.
    pub async fn join(self) {
        let Self { sender, task } = self;
        drop(sender);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "background agent task ended abnormally");
        }
    }
}

impl BackgroundAgent {
    pub fn new(queue: Arc<dyn IMutationQueue>, replayer: Arc<dyn IMutationReplayer>) -> Self {
        Self {
            queue,
            replayer,
            remote: None,
        }
    }

    pub fn has_remote_config(&self) -> bool {
        self.remote.is_some()
    }

    /// Start the agent loop. Completion notices go out on `events`.
    pub fn spawn(self, events: broadcast::Sender<AgentEvent>, capacity: usize) -> AgentHandle {
        let (sender, inbox) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(self.run(inbox, events));
        AgentHandle { sender, task }
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<AgentMessage>, events: broadcast::Sender<AgentEvent>) {
        tracing::info!("background agent started");
        while let Some(message) = inbox.recv().await {
            if let Some(event) = self.handle(message).await {
                // No listeners is fine; the drain already happened.
                let _ = events.send(event);
            }
        }
        tracing::info!("background agent inbox closed, exiting");
    }

    /// Process one message, returning the completion event for drains.
    pub async fn handle(&mut self, message: AgentMessage) -> Option<AgentEvent> {
        match message {
            AgentMessage::SetSupabaseConfig(remote) => {
                tracing::info!(url = %remote.url, "agent received remote config");
                self.remote = Some(remote);
                None
            }
            AgentMessage::ManualSync => Some(self.sync("manual").await),
            AgentMessage::BackgroundSync { tag } => Some(self.sync(&tag).await),
        }
    }

    async fn sync(&self, trigger: &str) -> AgentEvent {
        let report = self
            .drain()
            .instrument(drain_span!(trigger))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(trigger, error = %e, "drain skipped");
                DrainReport::aborted()
            });
        events::sync_completed(report.is_success(), report.synced);
        report.into_event()
    }

    /// Replay every pending mutation, oldest first. Success removes the
    /// record; failure spends one retry. A store error on one record is
    /// logged and the pass moves on.
    pub async fn drain(&self) -> Result<DrainReport, SyncError> {
        let remote = self.remote.as_ref().ok_or(SyncError::MissingRemoteConfig)?;

        self.queue.set_syncing_state(true, None);
        let pending = match self.queue.get_pending_mutations().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!(error = %e, "could not list pending mutations");
                self.queue.set_syncing_state(false, Some(false));
                return Ok(DrainReport::aborted());
            }
        };

        let mut report = DrainReport {
            attempted: pending.len(),
            ..DrainReport::default()
        };
        for mutation in &pending {
            match self.replayer.replay(mutation, remote).await {
                Ok(()) => match self.queue.remove_mutation(&mutation.id).await {
                    Ok(()) => report.synced += 1,
                    Err(e) => {
                        tracing::error!(mutation_id = %mutation.id, error = %e, "replayed but not removed");
                        report.failed += 1;
                    }
                },
                Err(replay_err) => {
                    report.failed += 1;
                    tracing::debug!(mutation_id = %mutation.id, error = %replay_err, "replay failed");
                    if let Err(e) = self.queue.increment_retry_count(&mutation.id).await {
                        tracing::error!(mutation_id = %mutation.id, error = %e, "could not record retry");
                    }
                }
            }
        }

        self.queue.set_syncing_state(false, Some(report.is_success()));
        Ok(report)
    }
}
