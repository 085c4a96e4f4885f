//! Resolved shared-state results.

use serde_json::Value;

/// Effective status of a shared state at some version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedStateStatus {
    /// A state snapshot is available.
    Set,
    /// A state has been reserved at this version but not yet published,
    /// or the barrier rule downgraded a set state (the publisher is not
    /// demonstrably caught up with the reader's reference event).
    Pending,
    /// No state exists at or before the requested version.
    None,
}

/// Outcome of a shared-state read: a status and, when available, the value.
///
/// `value` is populated for [`Set`](SharedStateStatus::Set) results and for
/// barrier-downgraded [`Pending`](SharedStateStatus::Pending) results, where
/// it carries the raw resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedStateResult {
    /// Effective status at the requested version.
    pub status: SharedStateStatus,
    /// Resolved value, if any.
    pub value: Option<Value>,
}

impl SharedStateResult {
    /// Creates a result.
    #[must_use]
    pub fn new(status: SharedStateStatus, value: Option<Value>) -> Self {
        Self { status, value }
    }

    /// The result for a version before any published state.
    #[must_use]
    pub fn none() -> Self {
        Self::new(SharedStateStatus::None, None)
    }

    /// Returns `true` if a snapshot is available.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.status == SharedStateStatus::Set
    }

    /// Returns `true` if the reader should retry later.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == SharedStateStatus::Pending
    }
}
