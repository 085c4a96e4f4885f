//! Event types for the Axle event hub.
//!
//! This crate provides the immutable [`Event`] value that flows through the
//! hub, plus the well-known event type and source names extensions match on.
//!
//! # Crate Architecture
//!
//! This crate is part of the **extension SDK** layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Extension SDK Layer                       │
//! │  (external, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axle-types     : EventId, ErrorCode                        │
//! │  axle-event     : Event, EventData  ◄── HERE                │
//! │  axle-extension : Extension trait, listeners                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event Flow Overview
//!
//! All communication between extensions flows through events:
//!
//! ```text
//! ┌──────────────┐  dispatch   ┌──────────────────────────────┐
//! │    Caller    │ ──────────► │           EventHub           │
//! └──────────────┘             │  sequence → preprocess →     │
//!                              │  respond → fan out           │
//!                              └──────────────────────────────┘
//!                                   │          │          │
//!                                   ▼          ▼          ▼
//!                              ┌────────┐ ┌────────┐ ┌────────┐
//!                              │  ext A │ │  ext B │ │  ext C │
//!                              └────────┘ └────────┘ └────────┘
//! ```
//!
//! # Response Correlation
//!
//! An event built with [`Event::response_to`] carries the id of its trigger;
//! the hub routes it to any response listener registered for that trigger.
//!
//! # Usage
//!
//! ```
//! use axle_event::{event_source, event_type, Event};
//! use serde_json::json;
//!
//! let trigger = Event::new("config request", event_type::HUB, event_source::REQUEST_CONTENT)
//!     .with_data(json!({"refresh": true}).as_object().cloned().unwrap());
//!
//! let response = Event::response_to(
//!     &trigger,
//!     "config response",
//!     event_type::HUB,
//!     event_source::RESPONSE_CONTENT,
//! );
//!
//! assert_eq!(response.response_id, Some(trigger.id));
//! ```

mod constants;
mod event;

pub use constants::{event_source, event_type};
pub use event::{Event, EventData};

// Re-export from axle_types for convenience
pub use axle_types::EventId;
