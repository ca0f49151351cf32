//! The queued-mutation model and its content signature.

mod action;
mod queued;
mod signature;

pub use action::MutationAction;
pub use queued::{NewMutation, QueuedMutation};
pub use signature::{canonical_json, compute_signature};
