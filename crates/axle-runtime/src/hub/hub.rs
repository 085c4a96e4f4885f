//! EventHub - the dispatch core.
//!
//! The [`EventHub`] owns the single totally-ordered event stream and
//! everything hanging off it:
//!
//! ```text
//! dispatch(event)
//!     │  stamp sequence number (atomic with enqueue)
//!     ▼
//! ┌─────────────────────── global event lane ───────────────────────┐
//! │  preprocess → route response listeners → fan out to containers  │
//! └─────────────────────────────────────────────────────────────────┘
//!      │                │                 │
//!      ▼                ▼                 ▼
//! ┌─────────┐      ┌─────────┐       ┌─────────┐
//! │  ext A  │      │  ext B  │       │   hub   │   one private lane each
//! └─────────┘      └─────────┘       └─────────┘
//! ```
//!
//! Registration, unregistration, `start`, and hub-state publication are
//! serialized on a separate control lane; no two of them ever run
//! concurrently.
//!
//! # Shared State
//!
//! Extensions publish versioned state through the hub; versions are event
//! sequence numbers, so a reader holding an event can ask "what was X's
//! state as of this event?" The optional read barrier additionally demands
//! that X has processed up to the event just before the reader's reference
//! event, closing the read-ahead race between a publisher and its readers.

use crate::constants::{
    hub_state, CORE_VERSION, EVENT_HUB_NAME, STATE_CHANGE_EVENT_NAME, STATE_OWNER_KEY,
};
use crate::counter::SequenceCounter;
use crate::executor::SerialExecutor;
use crate::hub::container::{ContainerState, ExtensionConstructor};
use crate::hub::response::ResponseEntry;
use crate::hub::{
    ExtensionApi, ExtensionContainer, RegistrationError, SharedStateResolver, WrapperType,
};
use crate::orderer::OperationOrderer;
use crate::state::{SharedStateResult, SharedStateStatus};
use axle_event::{event_source, event_type, Event, EventData};
use axle_extension::{Extension, ExtensionError, ListenerFilter};
use axle_types::EventId;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// A pure transformation applied to every event before routing.
pub type EventPreprocessor = Arc<dyn Fn(Event) -> Event + Send + Sync>;

/// The publish/subscribe kernel.
///
/// Construct with [`EventHub::new`] (within a Tokio runtime), register
/// extensions, then call [`start`](Self::start). The hub is always used
/// through an `Arc`; extensions receive an [`ExtensionApi`] handle holding
/// only weak references back to it.
///
/// ```no_run
/// use axle_runtime::EventHub;
///
/// # #[derive(Default)] struct Analytics;
/// # impl axle_extension::Extension for Analytics {
/// #     fn type_name(&self) -> &str { "com.example.module.analytics" }
/// #     fn version(&self) -> &str { "1.0.0" }
/// # }
/// # async fn run() {
/// let hub = EventHub::new();
/// hub.register_extension(
///     "com.example.module.analytics",
///     |_api| Ok(Box::new(Analytics::default())),
///     |error| assert!(error.is_none()),
/// );
/// hub.start();
/// # }
/// ```
pub struct EventHub {
    /// Registered containers by extension type name.
    registry: RwLock<HashMap<String, Arc<ExtensionContainer>>>,
    /// Sequence number of every dispatched event, by event id.
    event_numbers: RwLock<HashMap<EventId, u64>>,
    counter: SequenceCounter,
    /// Ids for response entries, so entries sharing a trigger stay distinct.
    response_entry_ids: SequenceCounter,
    preprocessors: RwLock<Vec<EventPreprocessor>>,
    response_listeners: Mutex<Vec<ResponseEntry>>,
    /// The global event lane.
    orderer: OperationOrderer<Event>,
    /// The control lane.
    control: SerialExecutor,
    /// Makes sequence stamping atomic with enqueueing.
    dispatch_gate: Mutex<()>,
    started: AtomicBool,
    shut_down: AtomicBool,
    wrapper: RwLock<WrapperType>,
    /// Back-reference handed to workers and long-lived callbacks.
    weak_self: RwLock<Weak<EventHub>>,
}

impl EventHub {
    /// Creates a hub and registers its own placeholder extension.
    ///
    /// Must be called within a Tokio runtime. Events may be dispatched
    /// immediately; they queue until [`start`](Self::start).
    #[must_use]
    pub fn new() -> Arc<Self> {
        let hub = Arc::new(Self {
            registry: RwLock::new(HashMap::new()),
            event_numbers: RwLock::new(HashMap::new()),
            counter: SequenceCounter::new(),
            response_entry_ids: SequenceCounter::new(),
            preprocessors: RwLock::new(Vec::new()),
            response_listeners: Mutex::new(Vec::new()),
            orderer: OperationOrderer::new("event-hub"),
            control: SerialExecutor::new("event-hub-control"),
            dispatch_gate: Mutex::new(()),
            started: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            wrapper: RwLock::new(WrapperType::None),
            weak_self: RwLock::new(Weak::new()),
        });
        *hub.weak_self.write() = Arc::downgrade(&hub);

        let weak = Arc::downgrade(&hub);
        hub.orderer.set_handler(Box::new(move |event: &Event| {
            if let Some(hub) = weak.upgrade() {
                hub.process_event(event);
            }
            true
        }));

        hub.register_extension(
            EVENT_HUB_NAME,
            |_api| Ok(Box::new(HubPlaceholderExtension)),
            |error| {
                if let Some(error) = error {
                    error!(%error, "hub placeholder registration failed");
                }
            },
        );

        hub
    }

    fn weak(&self) -> Weak<EventHub> {
        self.weak_self.read().clone()
    }

    fn strong(&self) -> Option<Arc<EventHub>> {
        self.weak_self.read().upgrade()
    }

    /// Starts draining the global event stream.
    ///
    /// Runs on the control lane and is idempotent. Publishes the initial
    /// hub shared state listing all currently-registered extensions;
    /// registrations that completed earlier batch into this single entry.
    pub fn start(&self) {
        let Some(hub) = self.strong() else { return };
        self.control.execute(move || {
            if hub.started.swap(true, Ordering::SeqCst) {
                debug!("event hub already started");
                return;
            }
            info!(version = CORE_VERSION, "event hub started");
            hub.orderer.start();
            hub.publish_hub_state();
        });
    }

    /// Dispatches an event into the global stream. Never blocks.
    ///
    /// The event is stamped with the next sequence number; stamping and
    /// enqueueing are atomic, so queue order always equals sequence order.
    pub fn dispatch(&self, event: Event) {
        if self.shut_down.load(Ordering::SeqCst) {
            warn!(event = %event.id, "event dropped: hub is shut down");
            return;
        }
        let _gate = self.dispatch_gate.lock();
        let seq = self.counter.increment_and_get();
        self.event_numbers.write().insert(event.id, seq);
        debug!(event = %event, seq, "event dispatched");
        self.orderer.add(event);
    }

    /// Registers an extension under its stable type name.
    ///
    /// Serialized on the control lane. The constructor runs on the
    /// extension's private worker with an [`ExtensionApi`] handle;
    /// `completion` observes `None` on success (after `on_registered`
    /// returned) or the reason for rejection. A successful registration
    /// re-publishes the hub shared state.
    pub fn register_extension<C, F>(&self, type_name: &str, constructor: C, completion: F)
    where
        C: FnOnce(ExtensionApi) -> Result<Box<dyn Extension>, ExtensionError> + Send + 'static,
        F: FnOnce(Option<RegistrationError>) + Send + 'static,
    {
        let Some(hub) = self.strong() else { return };
        let type_name = type_name.to_string();
        self.control.execute(move || {
            if type_name.is_empty() {
                warn!("rejecting registration with empty type name");
                completion(Some(RegistrationError::InvalidExtensionName));
                return;
            }
            if hub.registry.read().contains_key(&type_name) {
                warn!(extension = %type_name, "rejecting duplicate registration");
                completion(Some(RegistrationError::DuplicateExtensionName(type_name)));
                return;
            }

            let container = ExtensionContainer::new(&type_name);
            hub.registry
                .write()
                .insert(type_name.clone(), Arc::clone(&container));

            let weak = Arc::downgrade(&hub);
            let constructor: ExtensionConstructor = Box::new(constructor);
            container.init(weak, constructor, move |result| match result {
                Ok(()) => {
                    let publisher = Arc::clone(&hub);
                    hub.control.execute(move || publisher.publish_hub_state());
                    completion(None);
                }
                Err(error) => {
                    let cleanup = Arc::clone(&hub);
                    hub.control.execute(move || {
                        cleanup.registry.write().remove(&type_name);
                    });
                    completion(Some(RegistrationError::from(error)));
                }
            });
        });
    }

    /// Removes an extension by type name.
    ///
    /// Serialized on the control lane. Fires `on_unregistered` exactly
    /// once, discards the extension's queued events, re-publishes the hub
    /// shared state, and reports the outcome through `completion`.
    /// Outstanding response listeners are not cancelled; they complete by
    /// timeout.
    pub fn unregister_extension<F>(&self, type_name: &str, completion: F)
    where
        F: FnOnce(Option<RegistrationError>) + Send + 'static,
    {
        let Some(hub) = self.strong() else { return };
        let type_name = type_name.to_string();
        self.control.execute(move || {
            let removed = hub.registry.write().remove(&type_name);
            match removed {
                None => {
                    completion(Some(RegistrationError::ExtensionNotRegistered(type_name)));
                }
                Some(container) => {
                    container.shutdown();
                    hub.publish_hub_state();
                    completion(None);
                }
            }
        });
    }

    /// Awaits the response to `trigger` for at most `timeout`.
    ///
    /// The listener runs exactly once: with the matching response event if
    /// it arrives in time, else with `None` at the deadline. Whichever of
    /// the response and the timeout comes first removes the entry.
    pub fn register_response_listener<F>(&self, trigger: &Event, timeout: Duration, listener: F)
    where
        F: FnOnce(Option<Event>) + Send + 'static,
    {
        let entry_id = self.response_entry_ids.increment_and_get();
        let trigger_id = trigger.id;
        self.response_listeners.lock().push(ResponseEntry {
            id: entry_id,
            trigger_id,
            listener: Box::new(listener),
            timeout: None,
        });

        let weak = self.weak();
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(hub) = weak.upgrade() {
                hub.expire_response_listener(entry_id);
            }
        });

        let mut table = self.response_listeners.lock();
        match table.iter_mut().find(|entry| entry.id == entry_id) {
            Some(entry) => entry.timeout = Some(task),
            // The response already consumed the entry.
            None => task.abort(),
        }
    }

    /// Appends a preprocessor to the chain.
    ///
    /// Preprocessors run left-to-right on the global event lane, before
    /// response-listener matching; one that rewrites `response_id` thereby
    /// redirects responses. A panicking preprocessor is skipped (the event
    /// passes through unchanged by it).
    pub fn register_preprocessor<F>(&self, preprocessor: F)
    where
        F: Fn(Event) -> Event + Send + Sync + 'static,
    {
        self.preprocessors.write().push(Arc::new(preprocessor));
    }

    /// Registers a hub-level listener on the hub's own container.
    pub fn register_listener<F>(&self, event_type: &str, source: &str, listener: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let Some(hub) = self.strong() else { return };
        let filter = ListenerFilter::new(event_type, source);
        let listener: axle_extension::EventListener = Arc::new(listener);
        self.control.execute(move || {
            match hub.registry.read().get(EVENT_HUB_NAME).cloned() {
                Some(container) => container.register_listener(filter, listener),
                None => warn!("hub container missing; listener dropped"),
            }
        });
    }

    /// Publishes shared state for `extension_name`.
    ///
    /// Versioned at the sequence number of `event`, or 0 without one.
    /// Unknown owners are dropped with a warning. Dispatches a state-change
    /// notification on success.
    pub fn create_shared_state(&self, extension_name: &str, data: Value, event: Option<&Event>) {
        let Some(container) = self.container_for_state(extension_name) else {
            warn!(state = %extension_name, "cannot create shared state: unknown owner");
            return;
        };
        let version = self.version_for(event);
        container.timeline().set(version, data);
        debug!(state = %extension_name, version, "shared state created");
        self.dispatch_state_change(extension_name);
    }

    /// Reserves a pending shared state for `extension_name` and returns its
    /// one-shot resolver.
    ///
    /// Readers observe `Pending` at the reserved version until the resolver
    /// is invoked with the data.
    pub fn create_pending_shared_state(
        &self,
        extension_name: &str,
        event: Option<&Event>,
    ) -> Option<SharedStateResolver> {
        let Some(container) = self.container_for_state(extension_name) else {
            warn!(state = %extension_name, "cannot reserve shared state: unknown owner");
            return None;
        };
        let version = self.version_for(event);
        container.timeline().add_pending(version);
        debug!(state = %extension_name, version, "pending shared state reserved");
        Some(SharedStateResolver::new(
            self.weak(),
            extension_name.to_string(),
            version,
        ))
    }

    /// Resolves `extension_name`'s state as of `event` (or version 0).
    ///
    /// Returns `None` for an unknown extension. With `barrier`, a `Set`
    /// result is downgraded to `Pending` (value preserved) while the owner
    /// has not yet processed the event immediately preceding the reference
    /// event; the publisher may still be about to publish a newer state.
    pub fn get_shared_state(
        &self,
        extension_name: &str,
        event: Option<&Event>,
        barrier: bool,
    ) -> Option<SharedStateResult> {
        let container = self.container_for_state(extension_name)?;
        let version = self.version_for(event);
        let mut result = container.timeline().resolve(version);
        if barrier
            && result.status == SharedStateStatus::Set
            && !self.caught_up(&container, version)
        {
            result.status = SharedStateStatus::Pending;
        }
        Some(result)
    }

    /// Looks up a container by extension type name.
    #[must_use]
    pub fn get_extension_container(&self, type_name: &str) -> Option<Arc<ExtensionContainer>> {
        self.registry.read().get(type_name).cloned()
    }

    /// Records the embedding wrapper. Ignored after [`start`](Self::start).
    pub fn set_wrapper_type(&self, wrapper: WrapperType) {
        if self.started.load(Ordering::SeqCst) {
            warn!("wrapper type ignored: hub already started");
            return;
        }
        *self.wrapper.write() = wrapper;
    }

    /// The recorded embedding wrapper.
    #[must_use]
    pub fn wrapper_type(&self) -> WrapperType {
        *self.wrapper.read()
    }

    /// Stops the hub. Terminal.
    ///
    /// Pauses the global stream, unregisters every extension, and fails all
    /// outstanding response listeners with `None`. Later dispatches are
    /// dropped with a warning.
    pub fn shutdown(&self) {
        let Some(hub) = self.strong() else { return };
        self.control.execute(move || {
            if hub.shut_down.swap(true, Ordering::SeqCst) {
                return;
            }
            info!("event hub shutting down");
            hub.orderer.shutdown();

            let containers: Vec<_> = hub.registry.write().drain().map(|(_, c)| c).collect();
            for container in containers {
                container.shutdown();
            }

            let entries: Vec<ResponseEntry> = std::mem::take(&mut *hub.response_listeners.lock());
            for entry in entries {
                if let Some(task) = entry.timeout {
                    task.abort();
                }
                (entry.listener)(None);
            }

            hub.control.shutdown();
        });
    }

    // ---- global event lane ----

    /// Handler of the global orderer: preprocess, route responses, fan out.
    fn process_event(&self, event: &Event) {
        let event = self.apply_preprocessors(event.clone());

        if let Some(trigger_id) = event.response_id {
            self.route_response(trigger_id, &event);
        }

        let containers: Vec<Arc<ExtensionContainer>> =
            self.registry.read().values().cloned().collect();
        for container in containers {
            container.queue_event(event.clone());
        }
    }

    fn apply_preprocessors(&self, event: Event) -> Event {
        let preprocessors: Vec<EventPreprocessor> = self.preprocessors.read().clone();
        let mut current = event;
        for preprocessor in preprocessors {
            let input = current.clone();
            match catch_unwind(AssertUnwindSafe(|| preprocessor(input))) {
                Ok(output) => current = output,
                Err(_) => {
                    error!(event = %current.id, "preprocessor panicked; keeping prior event");
                }
            }
        }
        current
    }

    fn route_response(&self, trigger_id: EventId, response: &Event) {
        let matched: Vec<ResponseEntry> = {
            let mut table = self.response_listeners.lock();
            let mut matched = Vec::new();
            let mut i = 0;
            while i < table.len() {
                if table[i].trigger_id == trigger_id {
                    matched.push(table.remove(i));
                } else {
                    i += 1;
                }
            }
            matched
        };

        for entry in matched {
            if let Some(task) = entry.timeout {
                task.abort();
            }
            debug!(trigger = %trigger_id, response = %response.id, "response matched");
            (entry.listener)(Some(response.clone()));
        }
    }

    fn expire_response_listener(&self, entry_id: u64) {
        let entry = {
            let mut table = self.response_listeners.lock();
            table
                .iter()
                .position(|entry| entry.id == entry_id)
                .map(|i| table.remove(i))
        };
        if let Some(entry) = entry {
            debug!(trigger = %entry.trigger_id, "response listener timed out");
            (entry.listener)(None);
        }
    }

    // ---- shared state plumbing ----

    pub(crate) fn resolve_pending_state(&self, extension_name: &str, version: u64, data: Value) {
        let Some(container) = self.container_for_state(extension_name) else {
            warn!(state = %extension_name, "cannot resolve shared state: unknown owner");
            return;
        };
        container.timeline().update_pending(version, data);
        debug!(state = %extension_name, version, "pending shared state resolved");
        self.dispatch_state_change(extension_name);
    }

    fn container_for_state(&self, name: &str) -> Option<Arc<ExtensionContainer>> {
        self.registry
            .read()
            .values()
            .find(|container| container.shared_state_name() == name)
            .cloned()
    }

    fn version_for(&self, event: Option<&Event>) -> u64 {
        event.map_or(0, |event| {
            self.event_numbers
                .read()
                .get(&event.id)
                .copied()
                .unwrap_or(0)
        })
    }

    /// The barrier condition: the owner's last processed event must be no
    /// more than one sequence number behind the reference version.
    fn caught_up(&self, container: &ExtensionContainer, version: u64) -> bool {
        let last = container
            .last_processed_event()
            .and_then(|event| self.event_numbers.read().get(&event.id).copied())
            .unwrap_or(0);
        last >= version.saturating_sub(1)
    }

    fn dispatch_state_change(&self, owner: &str) {
        let mut data = EventData::new();
        data.insert(STATE_OWNER_KEY.to_string(), Value::String(owner.to_string()));
        let event = Event::new(
            STATE_CHANGE_EVENT_NAME,
            event_type::HUB,
            event_source::SHARED_STATE,
        )
        .with_data(data);
        self.dispatch(event);
    }

    // ---- hub shared state (control lane only) ----

    /// Writes a new hub-state entry: version 0 for the first entry, a fresh
    /// sequence number afterwards.
    fn publish_hub_state(&self) {
        if !self.started.load(Ordering::SeqCst) {
            return;
        }
        let Some(hub_container) = self.registry.read().get(EVENT_HUB_NAME).cloned() else {
            warn!("hub container missing; cannot publish hub state");
            return;
        };
        let version = if hub_container.timeline().is_empty() {
            0
        } else {
            self.counter.increment_and_get()
        };
        hub_container.timeline().set(version, self.hub_state_payload());
        debug!(version, "hub shared state published");
        self.dispatch_state_change(EVENT_HUB_NAME);
    }

    fn hub_state_payload(&self) -> Value {
        let wrapper = *self.wrapper.read();

        let mut extensions = serde_json::Map::new();
        for (type_name, container) in self.registry.read().iter() {
            if type_name == EVENT_HUB_NAME {
                continue;
            }
            if container.container_state() != ContainerState::Registered {
                continue;
            }
            let mut entry = serde_json::Map::new();
            entry.insert(
                hub_state::VERSION.to_string(),
                Value::String(container.version()),
            );
            if let Some(metadata) = container.metadata() {
                entry.insert(
                    hub_state::METADATA.to_string(),
                    serde_json::to_value(metadata).unwrap_or(Value::Null),
                );
            }
            extensions.insert(container.friendly_name(), Value::Object(entry));
        }

        let mut wrapper_entry = serde_json::Map::new();
        wrapper_entry.insert(
            hub_state::WRAPPER_TYPE.to_string(),
            Value::String(wrapper.tag().to_string()),
        );
        wrapper_entry.insert(
            hub_state::WRAPPER_FRIENDLY_NAME.to_string(),
            Value::String(wrapper.friendly_name().to_string()),
        );

        let mut payload = serde_json::Map::new();
        payload.insert(
            hub_state::VERSION.to_string(),
            Value::String(CORE_VERSION.to_string()),
        );
        payload.insert(hub_state::WRAPPER.to_string(), Value::Object(wrapper_entry));
        payload.insert(hub_state::EXTENSIONS.to_string(), Value::Object(extensions));
        Value::Object(payload)
    }
}

/// Stand-in extension owning the hub's own shared-state timeline.
struct HubPlaceholderExtension;

impl Extension for HubPlaceholderExtension {
    fn type_name(&self) -> &str {
        EVENT_HUB_NAME
    }

    fn friendly_name(&self) -> &str {
        "EventHub"
    }

    fn version(&self) -> &str {
        CORE_VERSION
    }
}
