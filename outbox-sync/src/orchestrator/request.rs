//! Per-call mutation description and its outcome.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use outbox_core::mutation::{MutationAction, QueuedMutation};

/// Hook invoked with the mutation payload.
pub type PayloadHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Metadata and hooks for one kind of write. Build once, reuse per call.
#[derive(Clone)]
pub struct MutationSpec {
    pub mutation_type: String,
    pub action: MutationAction,
    pub endpoint: String,
    pub optimistic_update: Option<PayloadHook>,
    pub rollback: Option<PayloadHook>,
    pub on_success: Option<PayloadHook>,
    /// Cache keys invalidated after an online success.
    pub invalidate_keys: Vec<String>,
}

impl MutationSpec {
    pub fn new(
        mutation_type: impl Into<String>,
        action: MutationAction,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            mutation_type: mutation_type.into(),
            action,
            endpoint: endpoint.into(),
            optimistic_update: None,
            rollback: None,
            on_success: None,
            invalidate_keys: Vec::new(),
        }
    }

    pub fn optimistic(mut self, hook: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.optimistic_update = Some(Arc::new(hook));
        self
    }

    pub fn rollback(mut self, hook: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.rollback = Some(Arc::new(hook));
        self
    }

    pub fn on_success(mut self, hook: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn invalidates(mut self, key: impl Into<String>) -> Self {
        self.invalidate_keys.push(key.into());
        self
    }

    pub(crate) fn apply_optimistic(&self, payload: &Value) {
        if let Some(hook) = &self.optimistic_update {
            hook(payload);
        }
    }

    pub(crate) fn apply_rollback(&self, payload: &Value) {
        if let Some(hook) = &self.rollback {
            hook(payload);
        }
    }

    pub(crate) fn apply_success(&self, payload: &Value) {
        if let Some(hook) = &self.on_success {
            hook(payload);
        }
    }
}

impl fmt::Debug for MutationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationSpec")
            .field("mutation_type", &self.mutation_type)
            .field("action", &self.action)
            .field("endpoint", &self.endpoint)
            .field("optimistic_update", &self.optimistic_update.is_some())
            .field("rollback", &self.rollback.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("invalidate_keys", &self.invalidate_keys)
            .finish()
    }
}

/// How a mutation call completed. Both arms are success from the caller's
/// point of view.
#[derive(Debug, Clone)]
pub enum MutationOutcome<T> {
    /// Executed against the remote.
    Completed(T),
    /// Deferred into the offline queue.
    Queued(QueuedMutation),
}

impl<T> MutationOutcome<T> {
    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Queued(_) => None,
        }
    }
}
