//! v001: the mutation queue table with its dedup and lookup indexes.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS mutation_queue (
    id            TEXT PRIMARY KEY,
    mutation_type TEXT NOT NULL,
    action        TEXT NOT NULL CHECK (action IN ('create', 'update', 'delete')),
    endpoint      TEXT NOT NULL,
    payload       TEXT NOT NULL,
    timestamp_ms  INTEGER NOT NULL,
    retry_count   INTEGER NOT NULL DEFAULT 0 CHECK (retry_count >= 0),
    max_retries   INTEGER NOT NULL,
    user_id       TEXT NOT NULL,
    signature     TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_mutation_queue_signature
    ON mutation_queue(signature);
CREATE INDEX IF NOT EXISTS idx_mutation_queue_user
    ON mutation_queue(user_id);
CREATE INDEX IF NOT EXISTS idx_mutation_queue_type
    ON mutation_queue(mutation_type);
CREATE INDEX IF NOT EXISTS idx_mutation_queue_timestamp
    ON mutation_queue(timestamp_ms);
";
