//! List queries. All results are in replay order: enqueue time, then
//! insertion order for equal timestamps.

use rusqlite::{params, Connection, ToSql};

use outbox_core::errors::OutboxResult;
use outbox_core::mutation::QueuedMutation;
use outbox_observability::events;

use super::row_codec::{RawRow, COLUMNS};
use crate::to_storage_err;

const ORDER: &str = "ORDER BY timestamp_ms ASC, rowid ASC";

/// Decoded rows plus the ids of rows that could not be decoded.
#[derive(Debug, Default)]
pub struct Listing {
    pub mutations: Vec<QueuedMutation>,
    pub undecodable: Vec<String>,
}

/// Every queued mutation across all users.
pub fn list_pending(conn: &Connection) -> OutboxResult<Listing> {
    let sql = format!("SELECT {COLUMNS} FROM mutation_queue {ORDER}");
    collect(conn, &sql, &[])
}

/// Mutations of one domain category.
pub fn list_by_type(conn: &Connection, mutation_type: &str) -> OutboxResult<Listing> {
    let sql = format!("SELECT {COLUMNS} FROM mutation_queue WHERE mutation_type = ?1 {ORDER}");
    collect(conn, &sql, params![mutation_type])
}

/// Mutations owned by one user.
pub fn list_by_user(conn: &Connection, user_id: &str) -> OutboxResult<Listing> {
    let sql = format!("SELECT {COLUMNS} FROM mutation_queue WHERE user_id = ?1 {ORDER}");
    collect(conn, &sql, params![user_id])
}

fn collect(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> OutboxResult<Listing> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(args, RawRow::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut listing = Listing::default();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        let id = raw.id.clone();
        match raw.decode() {
            Ok(mutation) => listing.mutations.push(mutation),
            Err(e) => {
                events::record_skipped(&id, &e.to_string());
                listing.undecodable.push(id);
            }
        }
    }
    Ok(listing)
}
