//! Mutation orchestrator: the application-facing write path.

mod request;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use outbox_core::config::OutboxConfig;
use outbox_core::errors::{OutboxResult, SyncError};
use outbox_core::models::{QueueStatus, RemoteConfig};
use outbox_core::mutation::NewMutation;
use outbox_core::traits::{ICacheInvalidator, IMutationQueue, NoopInvalidator};
use outbox_observability::mutation_span;

use crate::transport::{AgentEvent, AgentMessage, SyncChannel};

pub use request::{MutationOutcome, MutationSpec, PayloadHook};

pub struct MutationOrchestrator {
    queue: Arc<dyn IMutationQueue>,
    channel: SyncChannel,
    invalidator: Arc<dyn ICacheInvalidator>,
    remote: Option<RemoteConfig>,
    sync_tag: String,
    refresh_interval: Duration,
    invalidate_on_complete: Vec<String>,
    status: Arc<watch::Sender<QueueStatus>>,
    initialized: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl MutationOrchestrator {
    pub fn new(queue: Arc<dyn IMutationQueue>, channel: SyncChannel, config: &OutboxConfig) -> Self {
        let (status, _) = watch::channel(QueueStatus::default());
        Self {
            queue,
            channel,
            invalidator: Arc::new(NoopInvalidator),
            remote: config.remote.to_remote_config(),
            sync_tag: config.sync.tag.clone(),
            refresh_interval: Duration::from_millis(config.sync.status_refresh_interval_ms.max(1)),
            invalidate_on_complete: config.sync.invalidate_on_complete.clone(),
            status: Arc::new(status),
            initialized: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn ICacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    /// One-time startup: hand the remote config to the agent and start the
    /// status poller and completion listener. Later calls are no-ops.
    pub async fn init(&self) -> OutboxResult<()> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        if let Some(remote) = &self.remote {
            match self
                .channel
                .send(AgentMessage::SetSupabaseConfig(remote.clone()))
                .await
            {
                Ok(()) => tracing::info!("remote config handed to background agent"),
                Err(e) => tracing::warn!(error = %e, "remote config not delivered"),
            }
        }

        let poller = tokio::spawn(poll_status(
            Arc::clone(&self.queue),
            Arc::clone(&self.status),
            self.refresh_interval,
        ));
        let listener = tokio::spawn(listen_for_completion(
            self.channel.subscribe(),
            Arc::clone(&self.queue),
            Arc::clone(&self.invalidator),
            self.invalidate_on_complete.clone(),
            Arc::clone(&self.status),
        ));
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend([poller, listener]);

        refresh(self.queue.as_ref(), &self.status).await?;
        Ok(())
    }

    /// Execute `remote_call` now if online, otherwise defer into the queue.
    ///
    /// Online failures roll back the optimistic update and come back
    /// unchanged. Offline, the call succeeds with the queued record; only a
    /// local storage failure is an error.
    pub async fn mutate<T, F, Fut>(
        &self,
        spec: &MutationSpec,
        user_id: &str,
        payload: Value,
        remote_call: F,
    ) -> OutboxResult<MutationOutcome<T>>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = OutboxResult<T>>,
    {
        let span = mutation_span!(spec.mutation_type, spec.action);
        async move {
            spec.apply_optimistic(&payload);

            if self.channel.connectivity().is_online() {
                return match remote_call(payload.clone()).await {
                    Ok(value) => {
                        for key in &spec.invalidate_keys {
                            self.invalidator.invalidate(key);
                        }
                        spec.apply_success(&payload);
                        Ok(MutationOutcome::Completed(value))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "remote mutation failed, rolling back");
                        spec.apply_rollback(&payload);
                        Err(e)
                    }
                };
            }

            let mutation = NewMutation::new(
                spec.mutation_type.clone(),
                spec.action,
                spec.endpoint.clone(),
                payload.clone(),
                user_id,
            );
            let queued = match self.queue.queue_mutation(mutation).await {
                Ok(queued) => queued,
                Err(e) => {
                    tracing::error!(error = %e, "offline enqueue failed, rolling back");
                    spec.apply_rollback(&payload);
                    return Err(e);
                }
            };

            if !self.channel.register_background_sync(&self.sync_tag) {
                tracing::debug!(tag = %self.sync_tag, "background sync not registered");
            }
            if let Err(e) = refresh(self.queue.as_ref(), &self.status).await {
                tracing::warn!(error = %e, "status refresh failed after enqueue");
            }
            Ok(MutationOutcome::Queued(queued))
        }
        .instrument(span)
        .await
    }

    /// Mark the queue as syncing and ask the agent to drain it.
    pub async fn sync_now(&self) -> OutboxResult<()> {
        if !self.channel.has_active_agent() {
            return Err(SyncError::AgentUnavailable.into());
        }
        self.queue.set_syncing_state(true, None);
        if let Err(e) = self.channel.manual_sync().await {
            self.queue.set_syncing_state(false, Some(false));
            return Err(e);
        }
        refresh(self.queue.as_ref(), &self.status).await?;
        Ok(())
    }

    pub fn is_offline(&self) -> bool {
        !self.channel.connectivity().is_online()
    }

    /// Latest status snapshot.
    pub fn status(&self) -> QueueStatus {
        self.status.borrow().clone()
    }

    pub fn status_receiver(&self) -> watch::Receiver<QueueStatus> {
        self.status.subscribe()
    }

    pub async fn refresh_status(&self) -> OutboxResult<QueueStatus> {
        refresh(self.queue.as_ref(), &self.status).await
    }

    pub fn channel(&self) -> &SyncChannel {
        &self.channel
    }

    /// Stop the background tasks started by `init`.
    pub fn shutdown(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(|e| e.into_inner()));
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for MutationOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn refresh(
    queue: &dyn IMutationQueue,
    status: &watch::Sender<QueueStatus>,
) -> OutboxResult<QueueStatus> {
    let current = queue.get_queue_status().await?;
    status.send_replace(current.clone());
    Ok(current)
}

async fn poll_status(
    queue: Arc<dyn IMutationQueue>,
    status: Arc<watch::Sender<QueueStatus>>,
    every: Duration,
) {
    // init refreshes once itself, so the first tick waits a full period.
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(e) = refresh(queue.as_ref(), &status).await {
            tracing::warn!(error = %e, "periodic status refresh failed");
        }
    }
}

async fn listen_for_completion(
    mut events: broadcast::Receiver<AgentEvent>,
    queue: Arc<dyn IMutationQueue>,
    invalidator: Arc<dyn ICacheInvalidator>,
    keys: Vec<String>,
    status: Arc<watch::Sender<QueueStatus>>,
) {
    loop {
        match events.recv().await {
            Ok(AgentEvent::SyncComplete {
                success,
                synced_count,
            }) => {
                queue.set_syncing_state(false, Some(success));
                if synced_count > 0 {
                    for key in &keys {
                        invalidator.invalidate(key);
                    }
                }
                if let Err(e) = refresh(queue.as_ref(), &status).await {
                    tracing::warn!(error = %e, "status refresh failed after sync");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "completion listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
