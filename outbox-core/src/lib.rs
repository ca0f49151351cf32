//! # outbox-core
//!
//! Foundation crate for the offline mutation queue.
//! Defines the mutation model, signature generation, traits, errors, config,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod mutation;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::OutboxConfig;
pub use errors::{OutboxError, OutboxResult};
pub use models::{QueueStatus, RemoteConfig};
pub use mutation::{compute_signature, MutationAction, NewMutation, QueuedMutation};
