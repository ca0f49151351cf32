//! Row <-> `QueuedMutation` conversion.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Row;

use outbox_core::errors::StorageError;
use outbox_core::mutation::{MutationAction, QueuedMutation};

/// Column list shared by every SELECT on the queue.
pub(crate) const COLUMNS: &str = "id, mutation_type, action, endpoint, payload, timestamp_ms, \
     retry_count, max_retries, user_id, signature";

/// Raw column values, decoded lazily so one bad row can be skipped.
pub(crate) struct RawRow {
    pub id: String,
    mutation_type: String,
    action: String,
    endpoint: String,
    payload: String,
    timestamp_ms: i64,
    retry_count: i64,
    max_retries: i64,
    user_id: String,
    signature: String,
}

impl RawRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            mutation_type: row.get(1)?,
            action: row.get(2)?,
            endpoint: row.get(3)?,
            payload: row.get(4)?,
            timestamp_ms: row.get(5)?,
            retry_count: row.get(6)?,
            max_retries: row.get(7)?,
            user_id: row.get(8)?,
            signature: row.get(9)?,
        })
    }

    pub(crate) fn decode(self) -> Result<QueuedMutation, StorageError> {
        let corrupt = |reason: String| StorageError::CorruptRecord {
            id: self.id.clone(),
            reason,
        };
        let action: MutationAction = self.action.parse().map_err(|e| corrupt(format!("{e}")))?;
        let payload = serde_json::from_str(&self.payload)
            .map_err(|e| corrupt(format!("payload: {e}")))?;
        let timestamp = from_millis(self.timestamp_ms)
            .ok_or_else(|| corrupt(format!("timestamp out of range: {}", self.timestamp_ms)))?;
        let retry_count = u32::try_from(self.retry_count)
            .map_err(|_| corrupt(format!("retry_count: {}", self.retry_count)))?;
        let max_retries = u32::try_from(self.max_retries)
            .map_err(|_| corrupt(format!("max_retries: {}", self.max_retries)))?;

        Ok(QueuedMutation {
            id: self.id,
            mutation_type: self.mutation_type,
            action,
            endpoint: self.endpoint,
            payload,
            timestamp,
            retry_count,
            max_retries,
            user_id: self.user_id,
            signature: self.signature,
        })
    }
}

pub(crate) fn to_millis(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
