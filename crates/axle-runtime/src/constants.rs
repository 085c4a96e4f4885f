//! Reserved names and keys of the hub's external surface.

/// Registration key of the hub's own pseudo-extension.
///
/// The hub publishes its shared state (the roster of registered extensions)
/// under this name.
pub const EVENT_HUB_NAME: &str = "com.adobe.module.eventhub";

/// Version of the hub core, reported in the hub's shared state.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the state-change notification event.
pub const STATE_CHANGE_EVENT_NAME: &str = "Shared state change";

/// Key in a state-change event's data naming the extension whose state
/// changed.
pub const STATE_OWNER_KEY: &str = "stateowner";

/// Keys of the hub's own shared state.
pub mod hub_state {
    /// Hub core version.
    pub const VERSION: &str = "version";
    /// Map of registered extensions by friendly name.
    pub const EXTENSIONS: &str = "extensions";
    /// Per-extension metadata, nested under its entry.
    pub const METADATA: &str = "metadata";
    /// Embedding wrapper description.
    pub const WRAPPER: &str = "wrapper";
    /// Wrapper tag, nested under [`WRAPPER`].
    pub const WRAPPER_TYPE: &str = "type";
    /// Wrapper display name, nested under [`WRAPPER`].
    pub const WRAPPER_FRIENDLY_NAME: &str = "friendlyName";
}
