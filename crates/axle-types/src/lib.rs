//! Core types for the Axle event hub.
//!
//! This crate is the bottom of the **extension SDK** layer: the identifier
//! newtypes and the unified error-code interface every other Axle crate
//! builds on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Extension SDK Layer                       │
//! │  (external, SemVer stable, safe to depend on)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axle-types     : EventId, ErrorCode  ◄── HERE              │
//! │  axle-event     : Event, EventData, well-known names        │
//! │  axle-extension : Extension trait, listeners                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Crate Structure
//!
//! - [`EventId`] - Unique identity of a dispatched event
//! - [`ErrorCode`] - Machine-readable error codes with recoverability info
//! - [`assert_error_code`], [`assert_error_codes`] - Test helpers for code
//!   conventions

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::EventId;
