//! Insert-or-get, get, remove, and per-user clear.

use rusqlite::{params, Connection, OptionalExtension};

use outbox_core::errors::OutboxResult;
use outbox_core::mutation::QueuedMutation;

use super::row_codec::{to_millis, RawRow, COLUMNS};
use crate::to_storage_err;

/// Result of an enqueue attempt.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(QueuedMutation),
    /// A record with the same signature was already queued; it is returned
    /// unchanged.
    Existing(QueuedMutation),
}

impl InsertOutcome {
    pub fn into_mutation(self) -> QueuedMutation {
        match self {
            Self::Inserted(m) | Self::Existing(m) => m,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Existing(_))
    }
}

/// Insert a mutation unless its signature is already present.
/// The conflict check and the lookup of the surviving row share one
/// transaction, so concurrent identical enqueues all observe the same id.
pub fn insert_or_get(conn: &Connection, mutation: &QueuedMutation) -> OutboxResult<InsertOutcome> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_or_get begin: {e}")))?;

    let payload = serde_json::to_string(&mutation.payload)?;
    let inserted = tx
        .execute(
            "INSERT INTO mutation_queue (
                id, mutation_type, action, endpoint, payload, timestamp_ms,
                retry_count, max_retries, user_id, signature
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(signature) DO NOTHING",
            params![
                mutation.id,
                mutation.mutation_type,
                mutation.action.as_str(),
                mutation.endpoint,
                payload,
                to_millis(&mutation.timestamp),
                mutation.retry_count,
                mutation.max_retries,
                mutation.user_id,
                mutation.signature,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let outcome = if inserted == 1 {
        InsertOutcome::Inserted(mutation.clone())
    } else {
        match get_by_signature(&tx, &mutation.signature)? {
            Some(existing) => InsertOutcome::Existing(existing),
            None => {
                return Err(to_storage_err(format!(
                    "signature {} conflicted but no row was found",
                    mutation.signature
                )))
            }
        }
    };

    tx.commit()
        .map_err(|e| to_storage_err(format!("insert_or_get commit: {e}")))?;
    Ok(outcome)
}

/// Get a mutation by id.
pub fn get_mutation(conn: &Connection, id: &str) -> OutboxResult<Option<QueuedMutation>> {
    let sql = format!("SELECT {COLUMNS} FROM mutation_queue WHERE id = ?1");
    let raw = conn
        .query_row(&sql, params![id], RawRow::from_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(raw.map(RawRow::decode).transpose()?)
}

/// Get the mutation stored under a signature.
pub fn get_by_signature(conn: &Connection, signature: &str) -> OutboxResult<Option<QueuedMutation>> {
    let sql = format!("SELECT {COLUMNS} FROM mutation_queue WHERE signature = ?1");
    let raw = conn
        .query_row(&sql, params![signature], RawRow::from_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(raw.map(RawRow::decode).transpose()?)
}

/// Delete a mutation by id. Returns whether a row existed.
pub fn remove_mutation(conn: &Connection, id: &str) -> OutboxResult<bool> {
    let deleted = conn
        .execute("DELETE FROM mutation_queue WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted > 0)
}

/// Delete every mutation owned by `user_id`. Returns the number removed.
pub fn clear_user(conn: &Connection, user_id: &str) -> OutboxResult<usize> {
    conn.execute(
        "DELETE FROM mutation_queue WHERE user_id = ?1",
        params![user_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete rows that can no longer be decoded. Returns the number removed.
pub fn purge_undecodable(conn: &Connection, ids: &[String]) -> OutboxResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("purge_undecodable begin: {e}")))?;
    let mut removed = 0;
    for id in ids {
        removed += tx
            .execute("DELETE FROM mutation_queue WHERE id = ?1", params![id])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    tx.commit()
        .map_err(|e| to_storage_err(format!("purge_undecodable commit: {e}")))?;
    Ok(removed)
}
