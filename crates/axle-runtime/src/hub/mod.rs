//! The event hub and its supporting cast.
//!
//! - [`EventHub`] - dispatch core, registration, shared state
//! - [`ExtensionContainer`] - per-extension worker, listeners, timeline
//! - [`ExtensionApi`] - the handle extensions act through
//! - [`SharedStateResolver`] - one-shot pending-state resolution
//! - [`RegistrationError`] - registration failure taxonomy

mod api;
mod container;
mod error;
#[allow(clippy::module_inception)]
mod hub;
mod response;
mod wrapper;

pub use api::ExtensionApi;
pub use container::{ContainerState, ExtensionContainer};
pub use error::RegistrationError;
pub use hub::{EventHub, EventPreprocessor};
pub use response::{ResponseListener, SharedStateResolver};
pub use wrapper::WrapperType;
