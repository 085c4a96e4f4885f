//! Extension abstraction for the Axle event hub.
//!
//! This crate defines the contract an extension must satisfy to participate
//! in the hub: the [`Extension`] trait, the listener types the hub delivers
//! events through, and the error type extension hooks report.
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
//! │  axle-event     : Event, EventData, well-known names        │
//! │  axle-extension : Extension trait  ◄── HERE                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Extension Lifecycle
//!
//! ```text
//! registerExtension(name, constructor, completion)
//!     │
//!     ▼ (on the extension's private worker)
//! constructor(api) ──► on_registered() ──► events delivered
//!                                              │
//!                          ready_for_event() gates each delivery
//!                                              │
//! unregisterExtension ──► on_unregistered() ──► listeners dropped
//! ```
//!
//! # Example
//!
//! ```
//! use axle_extension::{Extension, ExtensionError};
//! use axle_event::Event;
//!
//! struct Analytics {
//!     booted: bool,
//! }
//!
//! impl Extension for Analytics {
//!     fn type_name(&self) -> &str {
//!         "com.example.module.analytics"
//!     }
//!
//!     fn friendly_name(&self) -> &str {
//!         "Analytics"
//!     }
//!
//!     fn version(&self) -> &str {
//!         "2.1.0"
//!     }
//!
//!     fn on_registered(&mut self) -> Result<(), ExtensionError> {
//!         self.booted = true;
//!         Ok(())
//!     }
//!
//!     fn ready_for_event(&self, _event: &Event) -> bool {
//!         self.booted
//!     }
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`Extension`] - Capability set of a hub participant
//! - [`EventListener`], [`ListenerFilter`], [`WILDCARD`] - Event delivery
//! - [`ExtensionError`] - Hook failures
//! - [`testing`] - Harness for testing extensions without a hub

mod error;
mod extension;
mod listener;
pub mod testing;

pub use error::ExtensionError;
pub use extension::Extension;
pub use listener::{EventListener, ListenerFilter, WILDCARD};
