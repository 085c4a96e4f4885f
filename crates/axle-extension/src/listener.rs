//! Event listeners and their type/source filters.

use axle_event::Event;
use std::sync::Arc;

/// Matches any value on the type or source axis of a filter.
pub const WILDCARD: &str = "*";

/// A callback the hub invokes with each matching event.
///
/// Listeners run on the owning extension's worker, one at a time, in
/// registration order. A panicking listener is caught and logged by the
/// container; it does not disable delivery to other listeners.
pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// A `(type, source)` pair selecting which events a listener receives.
///
/// Either axis may be [`WILDCARD`]. Comparisons are ASCII-case-insensitive,
/// so `"com.example.eventType.Hub"` matches `"com.example.eventtype.hub"`.
///
/// # Example
///
/// ```
/// use axle_extension::{ListenerFilter, WILDCARD};
/// use axle_event::Event;
///
/// let filter = ListenerFilter::new("t", WILDCARD);
///
/// assert!(filter.matches(&Event::new("a", "t", "s1")));
/// assert!(filter.matches(&Event::new("b", "T", "s2")));
/// assert!(!filter.matches(&Event::new("c", "other", "s1")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFilter {
    event_type: String,
    source: String,
}

impl ListenerFilter {
    /// Creates a filter for the given type and source.
    #[must_use]
    pub fn new(event_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source: source.into(),
        }
    }

    /// Returns the type axis of the filter.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the source axis of the filter.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the event matches both axes.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        axis_matches(&self.event_type, &event.event_type)
            && axis_matches(&self.source, &event.source)
    }
}

fn axis_matches(filter: &str, value: &str) -> bool {
    filter == WILDCARD || filter.eq_ignore_ascii_case(value)
}
