//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use outbox_core::config::StorageConfig;
use outbox_core::errors::OutboxResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and, for file-backed databases, the
/// read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` in memory: a second in-memory connection is a separate database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, config: &StorageConfig) -> OutboxResult<Self> {
        let writer = WriteConnection::open(path, config)?;
        let readers = ReadPool::open(path, config)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool (for testing). Writer only; every read goes
    /// through it.
    pub fn open_in_memory(config: &StorageConfig) -> OutboxResult<Self> {
        let writer = WriteConnection::open_in_memory(config)?;
        Ok(Self {
            writer,
            readers: None,
            db_path: None,
        })
    }
}
