//! Schema migrations using PRAGMA user_version.

pub mod v001_mutation_queue;

use rusqlite::Connection;

use outbox_core::errors::{OutboxResult, StorageError};

use crate::to_storage_err;

/// Ordered migration list: (sql, target version).
const MIGRATIONS: &[(&str, u32)] = &[(v001_mutation_queue::MIGRATION_SQL, 1)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Run all pending migrations. Each step commits together with its
/// `user_version` bump.
pub fn run_migrations(conn: &Connection) -> OutboxResult<()> {
    let current = current_version(conn)?;

    for (sql, version) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        let failed = |e: rusqlite::Error| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        };
        let tx = conn.unchecked_transaction().map_err(failed)?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed)?;
        tx.commit().map_err(failed)?;
        tracing::info!(version = version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> OutboxResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
