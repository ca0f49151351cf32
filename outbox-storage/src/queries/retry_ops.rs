//! Bounded retry accounting.

use rusqlite::{params, Connection, OptionalExtension};

use outbox_core::errors::OutboxResult;

use crate::to_storage_err;

/// What happened to a record after one more failed replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// No record with that id.
    NotFound,
    /// Counter bumped; the record stays queued.
    Retry { retry_count: u32 },
    /// Counter reached the bound; the record was deleted.
    Exhausted { retry_count: u32 },
}

impl RetryOutcome {
    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }
}

/// Increment `retry_count`, deleting the record once it reaches
/// `max_retries`. Read and write happen in one transaction.
pub fn increment_retry(conn: &Connection, id: &str) -> OutboxResult<(RetryOutcome, u32)> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("increment_retry begin: {e}")))?;

    let current: Option<(u32, u32)> = tx
        .query_row(
            "SELECT retry_count, max_retries FROM mutation_queue WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((retry_count, max_retries)) = current else {
        return Ok((RetryOutcome::NotFound, 0));
    };

    let next = retry_count.saturating_add(1);
    let outcome = if next >= max_retries {
        tx.execute("DELETE FROM mutation_queue WHERE id = ?1", params![id])
            .map_err(|e| to_storage_err(e.to_string()))?;
        RetryOutcome::Exhausted { retry_count: next }
    } else {
        tx.execute(
            "UPDATE mutation_queue SET retry_count = ?2 WHERE id = ?1",
            params![id, next],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        RetryOutcome::Retry { retry_count: next }
    };

    tx.commit()
        .map_err(|e| to_storage_err(format!("increment_retry commit: {e}")))?;
    Ok((outcome, max_retries))
}
