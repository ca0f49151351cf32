//! # outbox-sync
//!
//! Everything between the application and the durable queue: the
//! connectivity detector, the agent message protocol, the sync trigger and
//! completion channel, the background agent that drains the queue, and the
//! mutation orchestrator that decides per call whether to write now or defer.

pub mod agent;
pub mod connectivity;
pub mod orchestrator;
pub mod transport;

pub use agent::{AgentHandle, BackgroundAgent, DrainReport};
pub use connectivity::ConnectivityDetector;
pub use orchestrator::{MutationOrchestrator, MutationOutcome, MutationSpec};
pub use transport::{AgentEvent, AgentMessage, SyncChannel, SyncCompleteSubscription};
