//! Event hub runtime for the Axle SDK.
//!
//! This crate is the **runtime** layer beneath the extension SDK crates: it
//! owns the publish/subscribe kernel that dispatches typed events to
//! independently-running extension workers while maintaining per-extension
//! versioned shared state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                              EventHub                                │
//! │  ┌────────────────────────────────────────────────────────────────┐  │
//! │  │ control lane (SerialExecutor)                                  │  │
//! │  │   register / unregister / start / hub-state publication        │  │
//! │  ├────────────────────────────────────────────────────────────────┤  │
//! │  │ global event lane (OperationOrderer)                           │  │
//! │  │   sequence → preprocess → respond → fan out                    │  │
//! │  └────────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────────┘
//!            │ per-extension lanes     │                    │
//!            ▼                         ▼                    ▼
//!      ┌───────────┐            ┌───────────┐         ┌───────────┐
//!      │ container │            │ container │         │ container │
//!      │  queue    │            │  queue    │         │  queue    │
//!      │  listeners│            │  listeners│         │  listeners│
//!      │  timeline │            │  timeline │         │  timeline │
//!      └───────────┘            └───────────┘         └───────────┘
//! ```
//!
//! Three mechanisms interlock:
//!
//! 1. **Event dispatch** - a single totally-ordered stream. Each dispatched
//!    event gets a sequence number; the global lane preprocesses it, routes
//!    it to response listeners awaiting it, and appends it to every
//!    extension's private queue. Extensions drain independently.
//! 2. **Shared state versioning** - extensions publish state into
//!    append-only timelines versioned by event sequence numbers, so reads
//!    are consistent with respect to event ordering. A read *barrier*
//!    additionally refuses to surface a state until its publisher has
//!    demonstrably caught up with the reader.
//! 3. **Extension lifecycle** - registration and unregistration are
//!    serialized on a control lane; each extension is constructed on its
//!    own worker and reports readiness per event, holding its queue until
//!    it can process.
//!
//! # Usage
//!
//! ```no_run
//! use axle_event::Event;
//! use axle_runtime::EventHub;
//!
//! # struct Identity;
//! # impl axle_extension::Extension for Identity {
//! #     fn type_name(&self) -> &str { "com.example.module.identity" }
//! #     fn version(&self) -> &str { "3.0.0" }
//! # }
//! # async fn run() {
//! let hub = EventHub::new();
//!
//! hub.register_extension(
//!     "com.example.module.identity",
//!     |api| {
//!         api.register_listener("com.example.eventType.identity", "*", |event| {
//!             println!("identity event: {event}");
//!         });
//!         Ok(Box::new(Identity))
//!     },
//!     |error| assert!(error.is_none()),
//! );
//!
//! hub.start();
//! hub.dispatch(Event::new("sync", "com.example.eventType.identity", "s"));
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`EventHub`], [`ExtensionContainer`], [`ExtensionApi`] - the hub
//! - [`OperationOrderer`], [`SerialExecutor`], [`SequenceCounter`] - lanes
//! - [`SharedStateTimeline`], [`SharedStateResult`] - versioned state
//! - [`RegistrationError`] - failure taxonomy
//! - [`constants`] - reserved names of the external surface

pub mod constants;
mod counter;
mod executor;
mod hub;
mod orderer;
mod state;

pub use counter::SequenceCounter;
pub use executor::SerialExecutor;
pub use hub::{
    ContainerState, EventHub, EventPreprocessor, ExtensionApi, ExtensionContainer,
    RegistrationError, ResponseListener, SharedStateResolver, WrapperType,
};
pub use orderer::{OperationOrderer, OrderedHandler, OrdererState};
pub use state::{SharedStateResult, SharedStateStatus, SharedStateTimeline};

// Re-export the SDK-facing types extensions implement against.
pub use axle_event::{Event, EventData};
pub use axle_extension::{EventListener, Extension, ExtensionError, ListenerFilter, WILDCARD};
