//! Extension container: one extension, its worker, listeners, and timeline.

use crate::hub::api::ExtensionApi;
use crate::hub::EventHub;
use crate::orderer::OperationOrderer;
use crate::state::SharedStateTimeline;
use axle_event::Event;
use axle_extension::{EventListener, Extension, ExtensionError, ListenerFilter};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Constructor the hub invokes on the extension's private worker.
pub type ExtensionConstructor =
    Box<dyn FnOnce(ExtensionApi) -> Result<Box<dyn Extension>, ExtensionError> + Send>;

/// Lifecycle state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Created; the extension is being constructed on its worker.
    Registering,
    /// The extension is live and receiving events.
    Registered,
    /// The extension was removed or failed to initialize. Terminal.
    Unregistered,
}

/// Identity captured from the extension instance once it exists.
#[derive(Debug, Clone)]
struct ExtensionInfo {
    friendly_name: String,
    version: String,
    metadata: Option<HashMap<String, String>>,
    shared_state_name: String,
}

/// The hub's wrapper around one extension.
///
/// Owns the extension instance, its private event queue, its listener
/// registry, and its shared-state timeline. Event delivery runs on the
/// queue's worker, one event at a time: readiness gates delivery, the
/// last-processed event advances, then matching listeners run in
/// registration order.
pub struct ExtensionContainer {
    type_name: String,
    state: Mutex<ContainerState>,
    info: RwLock<Option<ExtensionInfo>>,
    extension: Mutex<Option<Box<dyn Extension>>>,
    orderer: OperationOrderer<Event>,
    listeners: Mutex<Vec<(ListenerFilter, EventListener)>>,
    last_processed: RwLock<Option<Event>>,
    timeline: SharedStateTimeline,
}

impl ExtensionContainer {
    pub(crate) fn new(type_name: &str) -> Arc<Self> {
        Arc::new(Self {
            type_name: type_name.to_string(),
            state: Mutex::new(ContainerState::Registering),
            info: RwLock::new(None),
            extension: Mutex::new(None),
            orderer: OperationOrderer::new(type_name),
            listeners: Mutex::new(Vec::new()),
            last_processed: RwLock::new(None),
            timeline: SharedStateTimeline::new(type_name),
        })
    }

    /// Constructs the extension on its private worker and reports the
    /// outcome through `completion` once `on_registered` has returned.
    pub(crate) fn init(
        self: Arc<Self>,
        hub: Weak<EventHub>,
        constructor: ExtensionConstructor,
        completion: impl FnOnce(Result<(), ExtensionError>) + Send + 'static,
    ) {
        let container = self;
        tokio::spawn(async move {
            let api = ExtensionApi::new(hub, Arc::downgrade(&container));

            let mut extension = match constructor(api) {
                Ok(extension) => extension,
                Err(err) => {
                    warn!(extension = %container.type_name, %err, "extension construction failed");
                    container.abandon();
                    completion(Err(err));
                    return;
                }
            };

            // Identity must be visible before the registration hook runs:
            // the hook may publish shared state through the api handle, and
            // that publish resolves the extension's shared-state name.
            *container.info.write() = Some(ExtensionInfo {
                friendly_name: extension.friendly_name().to_string(),
                version: extension.version().to_string(),
                metadata: extension.metadata(),
                shared_state_name: extension.shared_state_name().to_string(),
            });

            if let Err(err) = extension.on_registered() {
                warn!(extension = %container.type_name, %err, "extension registration hook failed");
                container.abandon();
                completion(Err(err));
                return;
            }

            *container.extension.lock() = Some(extension);

            let handler_container = Arc::downgrade(&container);
            container.orderer.set_handler(Box::new(move |event: &Event| {
                match handler_container.upgrade() {
                    Some(container) => container.process_event(event),
                    // Container is gone; drop the event.
                    None => true,
                }
            }));

            *container.state.lock() = ContainerState::Registered;
            info!(extension = %container.type_name, "extension registered");
            container.orderer.start();
            completion(Ok(()));
        });
    }

    /// Queue handler: readiness gate, last-processed bookkeeping, listener
    /// fan-out. Returns `false` to retain the event for a later retry.
    fn process_event(&self, event: &Event) -> bool {
        let ready = self
            .extension
            .lock()
            .as_ref()
            .map_or(true, |extension| extension.ready_for_event(event));
        if !ready {
            debug!(extension = %self.type_name, event = %event.id, "not ready, retaining event");
            return false;
        }

        *self.last_processed.write() = Some(event.clone());

        let matching: Vec<EventListener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(filter, _)| filter.matches(event))
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in matching {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(
                    extension = %self.type_name,
                    event = %event.id,
                    "listener panicked; continuing delivery"
                );
            }
        }
        true
    }

    /// Appends an event to the private queue.
    pub(crate) fn queue_event(&self, event: Event) {
        self.orderer.add(event);
    }

    /// Registers a listener; held until the container is unregistered.
    pub(crate) fn register_listener(&self, filter: ListenerFilter, listener: EventListener) {
        if *self.state.lock() == ContainerState::Unregistered {
            warn!(extension = %self.type_name, "listener dropped: container unregistered");
            return;
        }
        self.listeners.lock().push((filter, listener));
    }

    /// Resumes (or re-ticks) event delivery.
    pub fn start_events(&self) {
        self.orderer.start();
    }

    /// Pauses event delivery; queued events are retained.
    pub fn stop_events(&self) {
        self.orderer.pause();
    }

    /// Removes the extension: fires `on_unregistered` exactly once, drops
    /// all listeners, and discards pending events.
    pub(crate) fn shutdown(&self) {
        {
            let mut state = self.state.lock();
            if *state == ContainerState::Unregistered {
                return;
            }
            *state = ContainerState::Unregistered;
        }
        self.orderer.shutdown();
        if let Some(mut extension) = self.extension.lock().take() {
            extension.on_unregistered();
        }
        self.listeners.lock().clear();
        info!(extension = %self.type_name, "extension unregistered");
    }

    /// Marks a failed registration. The worker is stopped; `on_unregistered`
    /// is not fired because `on_registered` never completed.
    fn abandon(&self) {
        *self.state.lock() = ContainerState::Unregistered;
        self.orderer.shutdown();
    }

    /// Stable registration key.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn container_state(&self) -> ContainerState {
        *self.state.lock()
    }

    /// Display name; the type name until the extension reports one.
    #[must_use]
    pub fn friendly_name(&self) -> String {
        self.info
            .read()
            .as_ref()
            .map_or_else(|| self.type_name.clone(), |info| info.friendly_name.clone())
    }

    /// Extension version; empty until the extension reports one.
    #[must_use]
    pub fn version(&self) -> String {
        self.info
            .read()
            .as_ref()
            .map_or_else(String::new, |info| info.version.clone())
    }

    /// Extension metadata, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<HashMap<String, String>> {
        self.info.read().as_ref().and_then(|info| info.metadata.clone())
    }

    /// Name this extension publishes shared state under.
    #[must_use]
    pub fn shared_state_name(&self) -> String {
        self.info.read().as_ref().map_or_else(
            || self.type_name.clone(),
            |info| info.shared_state_name.clone(),
        )
    }

    /// The most recent event the handler accepted, if any.
    #[must_use]
    pub fn last_processed_event(&self) -> Option<Event> {
        self.last_processed.read().clone()
    }

    /// This extension's shared-state timeline.
    #[must_use]
    pub fn timeline(&self) -> &SharedStateTimeline {
        &self.timeline
    }
}
