//! QueueStorage owns the ConnectionPool and the sync flags, and implements
//! IMutationQueue.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;

use outbox_core::config::{OutboxConfig, StorageConfig};
use outbox_core::constants::MAX_RETRIES;
use outbox_core::errors::OutboxResult;
use outbox_core::models::QueueStatus;
use outbox_core::mutation::{NewMutation, QueuedMutation};
use outbox_core::traits::IMutationQueue;
use outbox_observability::events;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::mutation_query::Listing;
use crate::queries::retry_ops::RetryOutcome;
use crate::queries::row_codec::from_millis;
use crate::queries::{aggregation, mutation_crud, mutation_query, retry_ops};
use crate::sync_activity::SyncActivity;

/// Durable mutation queue on SQLite.
pub struct QueueStorage {
    pool: ConnectionPool,
    activity: SyncActivity,
    /// Bound stamped on newly queued records.
    max_retries: u32,
}

/// `db_path` value that selects an in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

impl QueueStorage {
    /// Open a queue backed by a file on disk.
    pub fn open(path: &Path, config: &StorageConfig) -> OutboxResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        let storage = Self {
            pool,
            activity: SyncActivity::new(),
            max_retries: MAX_RETRIES,
        };
        storage.initialize()?;
        tracing::info!(path = %path.display(), "mutation queue opened");
        Ok(storage)
    }

    /// Open an in-memory queue (for testing).
    pub fn open_in_memory() -> OutboxResult<Self> {
        Self::in_memory(&StorageConfig::default())
    }

    fn in_memory(config: &StorageConfig) -> OutboxResult<Self> {
        let pool = ConnectionPool::open_in_memory(config)?;
        let storage = Self {
            pool,
            activity: SyncActivity::new(),
            max_retries: MAX_RETRIES,
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Open the queue described by `[storage]`, stamping `[sync] max_retries`
    /// on new records. `db_path = ":memory:"` opens an in-memory queue.
    pub fn from_config(config: &OutboxConfig) -> OutboxResult<Self> {
        let storage = if config.storage.db_path == IN_MEMORY_PATH {
            Self::in_memory(&config.storage)?
        } else {
            Self::open(Path::new(&config.storage.db_path), &config.storage)?
        };
        Ok(storage.with_max_retries(config.sync.max_retries))
    }

    /// Override the retry bound stamped on records queued from now on.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn initialize(&self) -> OutboxResult<()> {
        self.pool
            .writer
            .with_conn_sync(migrations::run_migrations)
    }

    async fn with_reader<F, T>(&self, f: F) -> OutboxResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> OutboxResult<T> + Send,
        T: Send,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f).await,
        }
    }

    /// Run a listing and purge any rows it could not decode, so listings and
    /// status never disagree about what is pending.
    async fn list<F>(&self, f: F) -> OutboxResult<Vec<QueuedMutation>>
    where
        F: FnOnce(&rusqlite::Connection) -> OutboxResult<Listing> + Send,
    {
        let listing = self.with_reader(f).await?;
        if !listing.undecodable.is_empty() {
            let ids = &listing.undecodable;
            self.pool
                .writer
                .with_conn(|conn| mutation_crud::purge_undecodable(conn, ids))
                .await?;
            for id in ids {
                events::mutation_removed(id, true);
            }
        }
        Ok(listing.mutations)
    }

    fn build_record(&self, mutation: NewMutation) -> QueuedMutation {
        let signature = mutation.signature();
        let now = Utc::now();
        // Stored at millisecond precision; stamp the same value we return.
        let timestamp = from_millis(now.timestamp_millis()).unwrap_or(now);
        QueuedMutation {
            id: uuid::Uuid::new_v4().to_string(),
            mutation_type: mutation.mutation_type,
            action: mutation.action,
            endpoint: mutation.endpoint,
            payload: mutation.payload,
            timestamp,
            retry_count: 0,
            max_retries: self.max_retries,
            user_id: mutation.user_id,
            signature,
        }
    }
}

#[async_trait]
impl IMutationQueue for QueueStorage {
    async fn queue_mutation(&self, mutation: NewMutation) -> OutboxResult<QueuedMutation> {
        let record = self.build_record(mutation);
        let outcome = self
            .pool
            .writer
            .with_conn(|conn| mutation_crud::insert_or_get(conn, &record))
            .await?;

        if outcome.is_duplicate() {
            let existing = outcome.into_mutation();
            events::mutation_deduplicated(&existing.id, &existing.signature);
            Ok(existing)
        } else {
            events::mutation_queued(
                &record.id,
                &record.mutation_type,
                record.action.as_str(),
                &record.user_id,
            );
            Ok(outcome.into_mutation())
        }
    }

    async fn get_mutation(&self, id: &str) -> OutboxResult<Option<QueuedMutation>> {
        self.with_reader(|conn| mutation_crud::get_mutation(conn, id))
            .await
    }

    async fn get_pending_mutations(&self) -> OutboxResult<Vec<QueuedMutation>> {
        self.list(mutation_query::list_pending).await
    }

    async fn get_mutations_by_type(
        &self,
        mutation_type: &str,
    ) -> OutboxResult<Vec<QueuedMutation>> {
        self.list(|conn| mutation_query::list_by_type(conn, mutation_type))
            .await
    }

    async fn get_user_mutations(&self, user_id: &str) -> OutboxResult<Vec<QueuedMutation>> {
        self.list(|conn| mutation_query::list_by_user(conn, user_id))
            .await
    }

    async fn remove_mutation(&self, id: &str) -> OutboxResult<()> {
        let existed = self
            .pool
            .writer
            .with_conn(|conn| mutation_crud::remove_mutation(conn, id))
            .await?;
        events::mutation_removed(id, existed);
        Ok(())
    }

    async fn clear_user_mutations(&self, user_id: &str) -> OutboxResult<usize> {
        let removed = self
            .pool
            .writer
            .with_conn(|conn| mutation_crud::clear_user(conn, user_id))
            .await?;
        events::user_queue_cleared(user_id, removed);
        Ok(removed)
    }

    async fn increment_retry_count(&self, id: &str) -> OutboxResult<bool> {
        let (outcome, max_retries) = self
            .pool
            .writer
            .with_conn(|conn| retry_ops::increment_retry(conn, id))
            .await?;
        match outcome {
            RetryOutcome::NotFound => {}
            RetryOutcome::Retry { retry_count } => {
                events::retry_scheduled(id, retry_count, max_retries)
            }
            RetryOutcome::Exhausted { retry_count } => events::retries_exhausted(id, retry_count),
        }
        Ok(outcome.should_retry())
    }

    async fn get_queue_status(&self) -> OutboxResult<QueueStatus> {
        let pending = self.list(mutation_query::list_pending).await?;
        let (pending_count, oldest_mutation) = aggregation::pending_summary(&pending);
        let sync = self.activity.snapshot();
        Ok(QueueStatus {
            pending_count,
            oldest_mutation,
            is_syncing: sync.is_syncing,
            last_sync_attempt: sync.last_sync_attempt,
            last_sync_success: sync.last_sync_success,
        })
    }

    fn set_syncing_state(&self, is_syncing: bool, success: Option<bool>) {
        self.activity.set(is_syncing, success);
    }
}
