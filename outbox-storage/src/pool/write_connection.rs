//! Single write connection behind `tokio::sync::Mutex`.
//! Writes are serialized, so identical concurrent enqueues
//! resolve one after the other against the unique signature index.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use outbox_core::config::StorageConfig;
use outbox_core::errors::OutboxResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, config: &StorageConfig) -> OutboxResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(config: &StorageConfig) -> OutboxResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> OutboxResult<T>
    where
        F: FnOnce(&Connection) -> OutboxResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Synchronous access for startup work (migrations) before the connection
    /// is shared. Never blocks: fails if the lock is already held.
    pub fn with_conn_sync<F, T>(&self, f: F) -> OutboxResult<T>
    where
        F: FnOnce(&Connection) -> OutboxResult<T>,
    {
        let guard = self
            .conn
            .try_lock()
            .map_err(|_| to_storage_err("write connection is busy"))?;
        f(&guard)
    }
}
