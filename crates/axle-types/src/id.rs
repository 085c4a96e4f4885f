//! Identifier types for Axle.
//!
//! Identifiers are UUID-based so they stay unique when events are exported
//! to external collectors or compared across hub instances in tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for an event dispatched through the hub.
///
/// Every event gets a fresh random id at construction. The id is the unit
/// of response correlation: a response event carries the id of its trigger,
/// and the hub's event-number table is keyed by it.
///
/// # Example
///
/// ```
/// use axle_types::EventId;
///
/// let trigger = EventId::new();
/// let other = EventId::new();
///
/// assert_ne!(trigger, other);
/// println!("trigger: {}", trigger);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Creates a new [`EventId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}
