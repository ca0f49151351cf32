use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{compute_signature, MutationAction};

/// A write recorded while offline, waiting to be replayed.
///
/// Records are immutable apart from `retry_count`, which only grows until it
/// reaches `max_retries` and the record is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedMutation {
    /// UUID v4 assigned at enqueue time.
    pub id: String,
    /// Domain category, e.g. "goal", "transaction", "budget".
    #[serde(rename = "type")]
    pub mutation_type: String,
    pub action: MutationAction,
    /// Logical target resource.
    pub endpoint: String,
    /// Opaque request body.
    pub payload: serde_json::Value,
    /// Enqueue time, the replay ordering key.
    pub timestamp: DateTime<Utc>,
    pub retry_count: u32,
    pub max_retries: u32,
    /// Owner of the mutation.
    pub user_id: String,
    /// Content fingerprint of type + action + payload.
    pub signature: String,
}

impl QueuedMutation {
    /// Attempts left before the record is dropped.
    pub fn retries_remaining(&self) -> u32 {
        self.max_retries.saturating_sub(self.retry_count)
    }
}

/// Identity equality: two records are the same mutation when their ids match.
impl PartialEq for QueuedMutation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Input to `queue_mutation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMutation {
    #[serde(rename = "type")]
    pub mutation_type: String,
    pub action: MutationAction,
    pub endpoint: String,
    pub payload: serde_json::Value,
    pub user_id: String,
}

impl NewMutation {
    pub fn new(
        mutation_type: impl Into<String>,
        action: MutationAction,
        endpoint: impl Into<String>,
        payload: serde_json::Value,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            mutation_type: mutation_type.into(),
            action,
            endpoint: endpoint.into(),
            payload,
            user_id: user_id.into(),
        }
    }

    /// The dedup signature this mutation will be stored under.
    pub fn signature(&self) -> String {
        compute_signature(&self.mutation_type, self.action, &self.payload)
    }
}
