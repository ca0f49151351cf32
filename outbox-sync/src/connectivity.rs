//! Online/offline tracking on a `watch` channel.

use std::sync::Arc;

use tokio::sync::watch;

use outbox_observability::events;

/// Last observed connectivity signal, shared by every clone.
#[derive(Debug, Clone)]
pub struct ConnectivityDetector {
    state: Arc<watch::Sender<bool>>,
}

impl ConnectivityDetector {
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        Self {
            state: Arc::new(state),
        }
    }

    /// Snapshot of the last platform signal.
    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Feed a platform signal. Repeating the current state wakes nobody.
    pub fn set_online(&self, online: bool) {
        let changed = self.state.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            events::connectivity_changed(online);
        }
    }

    /// Live receiver for UI state.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Resolves immediately when online, otherwise on the next online signal.
    /// The receiver lives only for the duration of the call.
    pub async fn wait_for_online(&self) {
        let mut rx = self.state.subscribe();
        if rx.wait_for(|online| *online).await.is_err() {
            // Unreachable while `self` holds the sender.
            tracing::debug!("connectivity sender dropped while waiting");
        }
    }
}

impl Default for ConnectivityDetector {
    fn default() -> Self {
        Self::new(true)
    }
}
