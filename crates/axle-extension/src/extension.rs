//! Extension trait for hub participants.

use crate::ExtensionError;
use axle_event::Event;
use std::collections::HashMap;

/// Capability set of an Axle extension.
///
/// An extension is an independently-developed unit that reacts to events and
/// publishes shared state under a stable name. The hub wraps each instance
/// in a container that owns its event queue, listeners, and state timeline;
/// the trait below is everything the container needs from the instance.
///
/// # Identity
///
/// | Method | Purpose |
/// |--------|---------|
/// | `type_name` | Stable registration key, reverse-DNS by convention |
/// | `friendly_name` | Display name used in the hub's own shared state |
/// | `version` | Reported in the hub's own shared state |
/// | `metadata` | Optional extra key/value pairs for the hub state |
/// | `shared_state_name` | Name the extension publishes state under |
///
/// # Lifecycle Hooks
///
/// - `on_registered` runs once on the extension's private worker after
///   construction; listeners are typically registered from the constructor
///   via the API handle the hub passed in. Returning an error abandons the
///   registration and surfaces `EXTENSION_INITIALIZATION_FAILURE` to the
///   registration completion.
/// - `on_unregistered` runs exactly once when the extension is removed or
///   the hub shuts down.
/// - `ready_for_event` gates delivery: returning `false` leaves the event at
///   the head of the extension's queue to be retried later. Other extensions
///   are unaffected.
///
/// # Thread Safety
///
/// The hub confines each instance to its container; only one hook runs at a
/// time, so implementations need `Send` but not `Sync`.
pub trait Extension: Send {
    /// Stable registration key, e.g. `"com.example.module.analytics"`.
    fn type_name(&self) -> &str;

    /// Display name reported in the hub's own shared state.
    ///
    /// Defaults to [`type_name`](Self::type_name).
    fn friendly_name(&self) -> &str {
        self.type_name()
    }

    /// Extension version reported in the hub's own shared state.
    fn version(&self) -> &str;

    /// Optional metadata merged into the hub's own shared state.
    fn metadata(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Name this extension publishes shared state under.
    ///
    /// Defaults to [`type_name`](Self::type_name).
    fn shared_state_name(&self) -> &str {
        self.type_name()
    }

    /// Called once after construction, on the extension's private worker.
    ///
    /// # Errors
    ///
    /// Returning an error abandons the registration; the container is
    /// removed and the registration completion observes
    /// `EXTENSION_INITIALIZATION_FAILURE`.
    fn on_registered(&mut self) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Called exactly once when the extension is unregistered.
    fn on_unregistered(&mut self) {}

    /// Returns whether the extension can process the given event now.
    ///
    /// Returning `false` retains the event at the head of the extension's
    /// queue; it is retried on the next enqueue or when the extension
    /// re-ticks its queue through the API handle.
    fn ready_for_event(&self, _event: &Event) -> bool {
        true
    }
}
