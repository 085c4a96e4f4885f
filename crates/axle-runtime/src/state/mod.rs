//! Versioned shared state.
//!
//! Each extension publishes state as an append-only timeline of
//! `(version, entry)` pairs, where versions are event sequence numbers.
//! Readers resolve any version to the effective [`SharedStateResult`].

mod shared_state;
mod timeline;

pub use shared_state::{SharedStateResult, SharedStateStatus};
pub use timeline::SharedStateTimeline;
