//! Well-known event type and source names.
//!
//! These are the stable routing strings the hub and the built-in extensions
//! agree on. Third-party extensions define their own reverse-DNS names and
//! are free to match on these.

/// Well-known values for [`Event::event_type`](crate::Event::event_type).
pub mod event_type {
    /// Events emitted by the hub itself (shared-state change notifications).
    pub const HUB: &str = "com.adobe.eventType.hub";

    /// Matches any event type when used in a listener filter.
    pub const WILDCARD: &str = "*";
}

/// Well-known values for [`Event::source`](crate::Event::source).
pub mod event_source {
    /// Source of hub shared-state change notifications.
    pub const SHARED_STATE: &str = "com.adobe.eventSource.sharedState";

    /// Conventional source for events requesting work from an extension.
    pub const REQUEST_CONTENT: &str = "com.adobe.eventSource.requestContent";

    /// Conventional source for events answering a request.
    pub const RESPONSE_CONTENT: &str = "com.adobe.eventSource.responseContent";

    /// Matches any event source when used in a listener filter.
    pub const WILDCARD: &str = "*";
}
