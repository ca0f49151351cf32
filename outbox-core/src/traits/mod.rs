mod cache_invalidator;
mod mutation_queue;
mod replayer;

pub use cache_invalidator::{ICacheInvalidator, NoopInvalidator};
pub use mutation_queue::IMutationQueue;
pub use replayer::IMutationReplayer;
