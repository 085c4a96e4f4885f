//! The event value that flows through the hub.

use axle_types::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of an event: a string-keyed JSON map.
pub type EventData = serde_json::Map<String, Value>;

/// An immutable message delivered through the hub.
///
/// Events are cheap to clone and pass by value between workers; once
/// dispatched they are never mutated. Identity lives in [`id`](Self::id),
/// routing lives in [`event_type`](Self::event_type) and
/// [`source`](Self::source), and [`response_id`](Self::response_id) ties a
/// response back to its trigger.
///
/// # Example
///
/// ```
/// use axle_event::Event;
/// use serde_json::json;
///
/// let event = Event::new("track action", "com.example.eventType.analytics", "com.example.eventSource.requestContent")
///     .with_data(json!({"action": "login"}).as_object().cloned().unwrap());
///
/// assert_eq!(event.name, "track action");
/// assert!(event.response_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identity, assigned at construction.
    pub id: EventId,
    /// Human-readable name. Not used for routing.
    pub name: String,
    /// Routing axis one, e.g. `"com.example.eventType.analytics"`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Routing axis two, e.g. `"com.example.eventSource.requestContent"`.
    pub source: String,
    /// Optional payload.
    pub data: Option<EventData>,
    /// Construction time.
    pub timestamp: DateTime<Utc>,
    /// Id of the trigger event this event responds to, if any.
    pub response_id: Option<EventId>,
}

impl Event {
    /// Creates a new event with no payload.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        event_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            event_type: event_type.into(),
            source: source.into(),
            data: None,
            timestamp: Utc::now(),
            response_id: None,
        }
    }

    /// Creates a response event for the given trigger.
    ///
    /// The response gets a fresh id and timestamp; only
    /// [`response_id`](Self::response_id) links it to the trigger.
    #[must_use]
    pub fn response_to(
        trigger: &Event,
        name: impl Into<String>,
        event_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let mut event = Self::new(name, event_type, source);
        event.response_id = Some(trigger.id);
        event
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns `true` if this event responds to an earlier trigger.
    #[must_use]
    pub fn is_response(&self) -> bool {
        self.response_id.is_some()
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{} / {}] {}",
            self.name, self.event_type, self.source, self.id
        )
    }
}
