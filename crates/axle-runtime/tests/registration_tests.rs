//! End-to-end registration: lifecycle, error taxonomy, hub shared state.

mod common;

use axle_event::{event_source, event_type, Event};
use axle_extension::{Extension, ExtensionError};
use axle_runtime::constants::{hub_state, EVENT_HUB_NAME};
use axle_runtime::{EventHub, ExtensionApi, RegistrationError, SharedStateStatus, WrapperType};
use axle_types::ErrorCode;
use common::{completion, register_listening, register_ok, wait_until, StubExtension};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Latest hub shared state, read as of a freshly dispatched probe event.
fn latest_hub_state(hub: &Arc<EventHub>) -> Option<serde_json::Value> {
    let probe = Event::new("probe", "t", "s");
    hub.dispatch(probe.clone());
    hub.get_shared_state(EVENT_HUB_NAME, Some(&probe), false)
        .filter(|result| result.status == SharedStateStatus::Set)
        .and_then(|result| result.value)
}

fn roster(hub: &Arc<EventHub>) -> Vec<String> {
    latest_hub_state(hub)
        .and_then(|state| {
            state
                .get(hub_state::EXTENSIONS)
                .and_then(|extensions| extensions.as_object())
                .map(|extensions| extensions.keys().cloned().collect())
        })
        .unwrap_or_default()
}

async fn unregister(hub: &Arc<EventHub>, type_name: &str) -> Option<RegistrationError> {
    let (tx, rx) = oneshot::channel();
    hub.unregister_extension(type_name, move |error| {
        let _ = tx.send(error);
    });
    completion(rx).await
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_registration_is_rejected_and_harmless() {
    let hub = EventHub::new();
    let events = register_listening(&hub, StubExtension::new("com.test.x"), "t", "s").await;

    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        "com.test.x",
        |_api| Ok(Box::new(StubExtension::new("com.test.x"))),
        move |error| {
            let _ = tx.send(error);
        },
    );
    let error = completion(rx).await;
    assert_eq!(error.unwrap().code(), "DUPLICATE_EXTENSION_NAME");

    // The original container still works.
    hub.start();
    hub.dispatch(Event::new("still alive", "t", "s"));
    wait_until(|| !events.lock().is_empty()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_type_name_is_rejected() {
    let hub = EventHub::new();

    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        "",
        |_api| Ok(Box::new(StubExtension::new(""))),
        move |error| {
            let _ = tx.send(error);
        },
    );

    let error = completion(rx).await;
    assert_eq!(error.unwrap().code(), "INVALID_EXTENSION_NAME");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_initialization_surfaces_and_cleans_up() {
    let hub = EventHub::new();

    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        "com.test.broken",
        |_api| Err(ExtensionError::ConstructionFailed("no config".into())),
        move |error| {
            let _ = tx.send(error);
        },
    );

    let error = completion(rx).await;
    assert_eq!(error.unwrap().code(), "EXTENSION_INITIALIZATION_FAILURE");

    // The abandoned container is removed, freeing the name.
    wait_until(|| hub.get_extension_container("com.test.broken").is_none()).await;
    register_ok(&hub, StubExtension::new("com.test.broken")).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn unregistration_fires_hook_and_frees_the_name() {
    let hub = EventHub::new();
    let unregistered = Arc::new(AtomicUsize::new(0));
    register_ok(
        &hub,
        StubExtension::new("com.test.x").with_unregistered_counter(Arc::clone(&unregistered)),
    )
    .await;

    assert!(unregister(&hub, "com.test.x").await.is_none());
    assert_eq!(unregistered.load(Ordering::SeqCst), 1);
    assert!(hub.get_extension_container("com.test.x").is_none());

    let error = unregister(&hub, "com.test.x").await;
    assert_eq!(error.unwrap().code(), "EXTENSION_NOT_REGISTERED");
}

/// Publishes its boot state from inside `on_registered`, under a
/// shared-state name that differs from the registration key.
struct BootPublisher {
    api: ExtensionApi,
}

impl Extension for BootPublisher {
    fn type_name(&self) -> &str {
        "com.test.publisher"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn shared_state_name(&self) -> &str {
        "com.test.publisher.state"
    }

    fn on_registered(&mut self) -> Result<(), ExtensionError> {
        self.api.create_shared_state(json!({"booted": true}), None);
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn state_published_during_registration_uses_the_shared_state_name() {
    let hub = EventHub::new();

    let (tx, rx) = oneshot::channel();
    hub.register_extension(
        "com.test.publisher",
        |api| Ok(Box::new(BootPublisher { api })),
        move |error| {
            let _ = tx.send(error);
        },
    );
    assert!(completion(rx).await.is_none());

    // The state landed under the overridden shared-state name, not under
    // the registration key.
    let state = hub
        .get_shared_state("com.test.publisher.state", None, false)
        .expect("state owner known");
    assert_eq!(state.status, SharedStateStatus::Set);
    assert_eq!(state.value, Some(json!({"booted": true})));

    assert!(hub
        .get_shared_state("com.test.publisher", None, false)
        .is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn hub_state_tracks_the_registered_roster() {
    let hub = EventHub::new();
    hub.set_wrapper_type(WrapperType::Flutter);

    let events = register_listening(
        &hub,
        StubExtension::new("com.test.c")
            .with_friendly_name("Consent")
            .with_version("2.0.0"),
        event_type::WILDCARD,
        event_source::WILDCARD,
    )
    .await;
    let mut metadata = HashMap::new();
    metadata.insert("flavor".to_string(), "debug".to_string());
    register_ok(
        &hub,
        StubExtension::new("com.test.d")
            .with_friendly_name("Directory")
            .with_metadata(metadata),
    )
    .await;

    common::start_and_settle(&hub, &events).await;

    wait_until(|| {
        let names = roster(&hub);
        names.contains(&"Consent".to_string()) && names.contains(&"Directory".to_string())
    })
    .await;

    let state = latest_hub_state(&hub).unwrap();
    assert_eq!(state[hub_state::WRAPPER][hub_state::WRAPPER_TYPE], "F");
    assert_eq!(
        state[hub_state::EXTENSIONS]["Consent"][hub_state::VERSION],
        "2.0.0"
    );
    assert_eq!(
        state[hub_state::EXTENSIONS]["Directory"][hub_state::METADATA]["flavor"],
        "debug"
    );
    // The hub's own placeholder is not part of the roster.
    assert!(state[hub_state::EXTENSIONS]
        .as_object()
        .unwrap()
        .keys()
        .all(|name| name != "EventHub"));

    assert!(unregister(&hub, "com.test.d").await.is_none());

    wait_until(|| !roster(&hub).contains(&"Directory".to_string())).await;
    assert!(roster(&hub).contains(&"Consent".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn hub_level_listeners_observe_state_changes() {
    let hub = EventHub::new();
    let events = register_listening(
        &hub,
        StubExtension::new("com.test.a"),
        event_type::WILDCARD,
        event_source::WILDCARD,
    )
    .await;

    let notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notifications);
    hub.register_listener(event_type::HUB, event_source::SHARED_STATE, move |event| {
        sink.lock().push(event.name.clone());
    });
    // A later registration completing proves the control lane has installed
    // the listener above.
    register_ok(&hub, StubExtension::new("com.test.sync")).await;

    common::start_and_settle(&hub, &events).await;

    wait_until(|| !notifications.lock().is_empty()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_is_terminal() {
    let hub = EventHub::new();
    let unregistered = Arc::new(AtomicUsize::new(0));
    let events = register_listening(
        &hub,
        StubExtension::new("com.test.a").with_unregistered_counter(Arc::clone(&unregistered)),
        event_type::WILDCARD,
        event_source::WILDCARD,
    )
    .await;
    common::start_and_settle(&hub, &events).await;

    // An outstanding response listener fails over to None at shutdown.
    let trigger = Event::new("trigger", "t", "s");
    hub.dispatch(trigger.clone());
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&outcomes);
    hub.register_response_listener(&trigger, Duration::from_secs(30), move |response| {
        recorded.lock().push(response.is_some());
    });

    hub.shutdown();
    wait_until(|| unregistered.load(Ordering::SeqCst) == 1).await;
    wait_until(|| *outcomes.lock() == vec![false]).await;

    let before = events.lock().len();
    hub.dispatch(Event::new("ignored", "t", "s"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(events.lock().len(), before);
}

#[test]
fn registration_error_values_are_not_recoverable() {
    let err = RegistrationError::ExtensionNotRegistered("com.test.x".into());
    assert!(!err.is_recoverable());
}
