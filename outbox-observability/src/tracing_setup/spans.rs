//! Span definitions per operation: orchestrated mutation, queue drain.

/// Create a span around one orchestrated mutation.
#[macro_export]
macro_rules! mutation_span {
    ($mutation_type:expr, $action:expr) => {
        tracing::info_span!("outbox.mutation", mutation_type = %$mutation_type, action = %$action)
    };
}

/// Create a span around one background drain of the queue.
#[macro_export]
macro_rules! drain_span {
    ($trigger:expr) => {
        tracing::info_span!("outbox.drain", trigger = %$trigger)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const MUTATION: &str = "outbox.mutation";
    pub const DRAIN: &str = "outbox.drain";
}
