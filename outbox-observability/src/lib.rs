//! # outbox-observability
//!
//! Tracing subscriber setup, one structured event per queue transition, and
//! span macros for drains and orchestrated mutations.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
