//! Sync trigger and completion channel.
//!
//! Requests travel to the active agent over its `mpsc` inbox; completion
//! notices come back on a `broadcast` channel so any number of listeners
//! (orchestrator, UI) can observe them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use outbox_core::config::SyncConfig;
use outbox_core::errors::{OutboxResult, SyncError};
use outbox_observability::events;

use super::protocol::{AgentEvent, AgentMessage};
use crate::connectivity::ConnectivityDetector;

/// Cloneable handle; all clones talk to the same agent.
#[derive(Clone)]
pub struct SyncChannel {
    inner: Arc<ChannelInner>,
}

struct ChannelInner {
    agent: RwLock<Option<mpsc::Sender<AgentMessage>>>,
    events: broadcast::Sender<AgentEvent>,
    connectivity: ConnectivityDetector,
    background_sync_enabled: bool,
    /// Tags registered while offline, in arrival order.
    held_tags: Mutex<Vec<String>>,
    flush_scheduled: AtomicBool,
}

impl SyncChannel {
    pub fn new(connectivity: ConnectivityDetector, config: &SyncConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            inner: Arc::new(ChannelInner {
                agent: RwLock::new(None),
                events,
                connectivity,
                background_sync_enabled: config.background_sync_enabled,
                held_tags: Mutex::new(Vec::new()),
                flush_scheduled: AtomicBool::new(false),
            }),
        }
    }

    pub fn connectivity(&self) -> &ConnectivityDetector {
        &self.inner.connectivity
    }

    /// Attach the inbox of the active agent, replacing any previous one.
    pub fn register_agent(&self, sender: mpsc::Sender<AgentMessage>) {
        let mut agent = self.inner.agent.write().unwrap_or_else(|e| e.into_inner());
        *agent = Some(sender);
        tracing::debug!("background agent registered");
    }

    /// An agent is attached and its inbox is still open.
    pub fn has_active_agent(&self) -> bool {
        self.inner
            .agent_sender()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Sender the agent publishes completion events on.
    pub fn event_sender(&self) -> broadcast::Sender<AgentEvent> {
        self.inner.events.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.inner.events.subscribe()
    }

    /// Deliver a message to the active agent, waiting for inbox capacity.
    pub async fn send(&self, message: AgentMessage) -> OutboxResult<()> {
        self.inner.send(message).await
    }

    /// Ask the agent to drain the queue now.
    pub async fn manual_sync(&self) -> OutboxResult<()> {
        events::sync_requested("manual", "MANUAL_SYNC");
        self.send(AgentMessage::ManualSync).await
    }

    /// Request opportunistic background processing under `tag`.
    ///
    /// Returns `false` when background sync is disabled or no agent is
    /// attached. Online, the request goes out at once. Offline, the tag is
    /// held and a single flush task delivers every held tag on the next
    /// online signal. Must be called from within a tokio runtime.
    pub fn register_background_sync(&self, tag: &str) -> bool {
        if !self.inner.background_sync_enabled {
            tracing::debug!(tag, "background sync disabled, not registering");
            return false;
        }
        let Some(sender) = self.inner.agent_sender().filter(|s| !s.is_closed()) else {
            tracing::debug!(tag, "no background agent, not registering");
            return false;
        };
        events::sync_requested(tag, "BACKGROUND_SYNC");

        if self.inner.connectivity.is_online() {
            let message = AgentMessage::BackgroundSync {
                tag: tag.to_string(),
            };
            return match sender.try_send(message) {
                Ok(()) => true,
                // A queued request already covers this drain.
                Err(mpsc::error::TrySendError::Full(_)) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            };
        }

        {
            let mut held = self.inner.held_tags.lock().unwrap_or_else(|e| e.into_inner());
            if !held.iter().any(|t| t == tag) {
                held.push(tag.to_string());
            }
        }
        if !self.inner.flush_scheduled.swap(true, Ordering::AcqRel) {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                inner.connectivity.wait_for_online().await;
                inner.flush_held_tags().await;
            });
        }
        true
    }

    /// Run `callback(success, synced_count)` for every completion notice until
    /// the returned subscription is unsubscribed or dropped. Must be called
    /// from within a tokio runtime.
    pub fn on_sync_complete<F>(&self, callback: F) -> SyncCompleteSubscription
    where
        F: Fn(bool, usize) + Send + 'static,
    {
        let mut rx = self.inner.events.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AgentEvent::SyncComplete {
                        success,
                        synced_count,
                    }) => callback(success, synced_count),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "sync completion listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        SyncCompleteSubscription { task }
    }
}

impl ChannelInner {
    fn agent_sender(&self) -> Option<mpsc::Sender<AgentMessage>> {
        self.agent
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn send(&self, message: AgentMessage) -> OutboxResult<()> {
        let sender = self.agent_sender().ok_or(SyncError::AgentUnavailable)?;
        let kind = message.kind();
        sender.send(message).await.map_err(|_| SyncError::ChannelClosed {
            reason: format!("agent inbox closed while sending {kind}"),
        })?;
        Ok(())
    }

    async fn flush_held_tags(&self) {
        self.flush_scheduled.store(false, Ordering::Release);
        let tags = std::mem::take(&mut *self.held_tags.lock().unwrap_or_else(|e| e.into_inner()));
        for tag in tags {
            if let Err(e) = self.send(AgentMessage::BackgroundSync { tag: tag.clone() }).await {
                tracing::warn!(tag = %tag, error = %e, "dropping held background sync");
            }
        }
    }
}

/// Live completion listener.
#[must_use = "dropping the subscription stops the listener"]
pub struct SyncCompleteSubscription {
    task: JoinHandle<()>,
}

impl SyncCompleteSubscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SyncCompleteSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
