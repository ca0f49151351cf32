//! Foreground <-> agent transport: the message protocol and the channel
//! that carries it.

mod channel;
pub mod protocol;

pub use channel::{SyncChannel, SyncCompleteSubscription};
pub use protocol::{AgentEvent, AgentMessage};
