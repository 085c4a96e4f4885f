//! Per-extension façade over the hub.

use crate::hub::{EventHub, ExtensionContainer, SharedStateResolver};
use crate::state::SharedStateResult;
use axle_event::Event;
use axle_extension::ListenerFilter;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Handle the hub passes to an extension constructor.
///
/// Everything an extension does to the outside world goes through this
/// handle: dispatching events, registering listeners, publishing and reading
/// shared state, and pausing/resuming its own event delivery.
///
/// The handle holds only weak references to the hub and the owning
/// container, so an extension that stashes it (or captures it in a closure)
/// cannot keep a discarded hub alive. Every operation is a logged no-op
/// once the hub or container is gone.
#[derive(Clone)]
pub struct ExtensionApi {
    hub: Weak<EventHub>,
    container: Weak<ExtensionContainer>,
}

impl ExtensionApi {
    pub(crate) fn new(hub: Weak<EventHub>, container: Weak<ExtensionContainer>) -> Self {
        Self { hub, container }
    }

    fn hub(&self) -> Option<Arc<EventHub>> {
        let hub = self.hub.upgrade();
        if hub.is_none() {
            debug!("extension api call ignored: hub is gone");
        }
        hub
    }

    fn container(&self) -> Option<Arc<ExtensionContainer>> {
        let container = self.container.upgrade();
        if container.is_none() {
            debug!("extension api call ignored: container is gone");
        }
        container
    }

    /// Dispatches an event into the hub.
    pub fn dispatch(&self, event: Event) {
        if let Some(hub) = self.hub() {
            hub.dispatch(event);
        }
    }

    /// Registers a listener on the owning extension's container.
    ///
    /// Either axis may be [`axle_extension::WILDCARD`]. Listeners run on the
    /// extension's worker in registration order.
    pub fn register_listener<F>(&self, event_type: &str, source: &str, listener: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        if let Some(container) = self.container() {
            container.register_listener(
                ListenerFilter::new(event_type, source),
                Arc::new(listener),
            );
        }
    }

    /// Publishes shared state for the owning extension.
    ///
    /// Versioned at the sequence number of `event`, or 0 without one.
    pub fn create_shared_state(&self, data: Value, event: Option<&Event>) {
        let (Some(hub), Some(container)) = (self.hub(), self.container()) else {
            return;
        };
        hub.create_shared_state(&container.shared_state_name(), data, event);
    }

    /// Reserves a pending shared state for the owning extension.
    ///
    /// Returns the one-shot resolver to publish the data later.
    pub fn create_pending_shared_state(&self, event: Option<&Event>) -> Option<SharedStateResolver> {
        let (hub, container) = (self.hub()?, self.container()?);
        hub.create_pending_shared_state(&container.shared_state_name(), event)
    }

    /// Reads another extension's shared state. See
    /// [`EventHub::get_shared_state`].
    pub fn get_shared_state(
        &self,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
    ) -> Option<SharedStateResult> {
        self.hub()?.get_shared_state(extension_name, event, barrier)
    }

    /// Resumes (or re-ticks) this extension's event delivery.
    ///
    /// Call whenever readiness changes so events a previous
    /// `ready_for_event` refused are retried.
    pub fn start_events(&self) {
        if let Some(container) = self.container() {
            container.start_events();
        }
    }

    /// Pauses this extension's event delivery; queued events are retained.
    pub fn stop_events(&self) {
        if let Some(container) = self.container() {
            container.stop_events();
        }
    }
}
