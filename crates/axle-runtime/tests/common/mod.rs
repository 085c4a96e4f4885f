//! Shared fixtures for hub integration tests.
#![allow(dead_code)]

use axle_event::Event;
use axle_extension::Extension;
use axle_runtime::{EventHub, RegistrationError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Configurable extension stub for driving the hub in tests.
pub struct StubExtension {
    type_name: String,
    friendly_name: String,
    version: String,
    metadata: Option<HashMap<String, String>>,
    ready: Arc<AtomicBool>,
    unregistered: Arc<AtomicUsize>,
}

impl StubExtension {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            friendly_name: type_name.to_string(),
            version: "1.0.0".to_string(),
            metadata: None,
            ready: Arc::new(AtomicBool::new(true)),
            unregistered: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_friendly_name(mut self, friendly_name: &str) -> Self {
        self.friendly_name = friendly_name.to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Shares the readiness flag so tests can gate delivery.
    pub fn with_ready_flag(mut self, ready: Arc<AtomicBool>) -> Self {
        self.ready = ready;
        self
    }

    /// Shares the unregistration counter.
    pub fn with_unregistered_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.unregistered = counter;
        self
    }

    pub fn type_name_string(&self) -> String {
        self.type_name.clone()
    }
}

impl Extension for StubExtension {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn metadata(&self) -> Option<HashMap<String, String>> {
        self.metadata.clone()
    }

    fn on_unregistered(&mut self) {
        self.unregistered.fetch_add(1, Ordering::SeqCst);
    }

    fn ready_for_event(&self, _event: &Event) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Awaits a registration/unregistration completion callback.
pub async fn completion(rx: oneshot::Receiver<Option<RegistrationError>>) -> Option<RegistrationError> {
    tokio::time::timeout(Duration::from_secs(2), rx)
        .await
        .expect("completion before deadline")
        .expect("completion delivered")
}

/// Registers `extension` and panics unless the completion reports success.
pub async fn register_ok(hub: &Arc<EventHub>, extension: StubExtension) {
    let type_name = extension.type_name_string();
    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        &type_name,
        move |_api| Ok(Box::new(extension)),
        move |error| {
            let _ = tx.send(error);
        },
    );
    let error = completion(rx).await;
    assert!(error.is_none(), "registration failed: {error:?}");
}

/// Registers `extension` with one listener and returns the events it saw.
pub async fn register_listening(
    hub: &Arc<EventHub>,
    extension: StubExtension,
    event_type: &str,
    source: &str,
) -> Arc<Mutex<Vec<Event>>> {
    let type_name = extension.type_name_string();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let filter_type = event_type.to_string();
    let filter_source = source.to_string();

    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        &type_name,
        move |api| {
            api.register_listener(&filter_type, &filter_source, move |event| {
                sink.lock().push(event.clone());
            });
            Ok(Box::new(extension))
        },
        move |error| {
            let _ = tx.send(error);
        },
    );
    let error = completion(rx).await;
    assert!(error.is_none(), "registration failed: {error:?}");

    events
}

/// Polls until the condition holds; panics after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met before deadline"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

/// Starts the hub and waits until the initial hub-state notification has
/// fanned out to the given sink (any wildcard listener sees it first).
pub async fn start_and_settle(hub: &Arc<EventHub>, sink: &Arc<Mutex<Vec<Event>>>) {
    hub.start();
    wait_until(|| !sink.lock().is_empty()).await;
}
