//! End-to-end dispatch: ordering, response correlation, preprocessors.

mod common;

use axle_event::{event_source, event_type, Event};
use axle_runtime::EventHub;
use common::{register_listening, wait_until, StubExtension};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn listeners_observe_events_in_dispatch_order() {
    let hub = EventHub::new();
    let a_events = register_listening(&hub, StubExtension::new("com.test.a"), "t", "s").await;
    let b_events = register_listening(&hub, StubExtension::new("com.test.b"), "t", "s").await;

    // Dispatch before start: events queue, sequence numbers start at 1.
    let e1 = Event::new("one", "t", "s");
    let e2 = Event::new("two", "t", "s");
    let e3 = Event::new("three", "t", "s");
    hub.dispatch(e1.clone());
    hub.dispatch(e2.clone());
    hub.dispatch(e3.clone());

    // Pending reservations expose the sequence number assigned to each event.
    let v1 = hub
        .create_pending_shared_state("com.test.a", Some(&e1))
        .unwrap()
        .version();
    let v2 = hub
        .create_pending_shared_state("com.test.a", Some(&e2))
        .unwrap()
        .version();
    let v3 = hub
        .create_pending_shared_state("com.test.a", Some(&e3))
        .unwrap()
        .version();
    assert_eq!((v1, v2, v3), (1, 2, 3));

    hub.start();

    wait_until(|| a_events.lock().len() == 3 && b_events.lock().len() == 3).await;
    let a_names: Vec<_> = a_events.lock().iter().map(|e| e.name.clone()).collect();
    let b_names: Vec<_> = b_events.lock().iter().map(|e| e.name.clone()).collect();
    assert_eq!(a_names, vec!["one", "two", "three"]);
    assert_eq!(b_names, vec!["one", "two", "three"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn response_listener_receives_matching_response() {
    let hub = EventHub::new();
    let sink = register_listening(&hub,
        StubExtension::new("com.test.a"),
        event_type::WILDCARD,
        event_source::WILDCARD,
    ).await;
    common::start_and_settle(&hub, &sink).await;

    let trigger = Event::new("trigger", "t", "s");
    hub.dispatch(trigger.clone());

    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&outcomes);
    hub.register_response_listener(&trigger, Duration::from_secs(5), move |response| {
        recorded.lock().push(response);
    });

    let response = Event::response_to(&trigger, "answer", "t", "s");
    let response_id = response.id;
    hub.dispatch(response);

    wait_until(|| !outcomes.lock().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let outcomes = outcomes.lock();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].as_ref().map(|e| e.id), Some(response_id));
}

#[tokio::test(flavor = "multi_thread")]
async fn response_listener_times_out_with_none() {
    let hub = EventHub::new();
    let sink = register_listening(&hub,
        StubExtension::new("com.test.a"),
        event_type::WILDCARD,
        event_source::WILDCARD,
    ).await;
    common::start_and_settle(&hub, &sink).await;

    let trigger = Event::new("trigger", "t", "s");
    hub.dispatch(trigger.clone());

    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&outcomes);
    hub.register_response_listener(&trigger, Duration::from_millis(50), move |response| {
        recorded.lock().push(response);
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*outcomes.lock(), vec![None]);

    // The entry is gone: a late response goes nowhere.
    hub.dispatch(Event::response_to(&trigger, "late", "t", "s"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(outcomes.lock().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn preprocessor_can_redirect_responses() {
    let hub = EventHub::new();
    let sink = register_listening(&hub,
        StubExtension::new("com.test.a"),
        event_type::WILDCARD,
        event_source::WILDCARD,
    ).await;
    common::start_and_settle(&hub, &sink).await;

    let trigger = Event::new("trigger", "t", "s");
    hub.dispatch(trigger.clone());

    // Preprocessors run before response matching, so rewriting the response
    // id redirects the decoy to the trigger's listener.
    let trigger_id = trigger.id;
    hub.register_preprocessor(move |mut event: Event| {
        if event.name == "decoy" {
            event.response_id = Some(trigger_id);
        }
        event
    });

    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&outcomes);
    hub.register_response_listener(&trigger, Duration::from_secs(5), move |response| {
        recorded.lock().push(response.map(|e| e.name));
    });

    hub.dispatch(Event::new("decoy", "t", "s"));

    wait_until(|| !outcomes.lock().is_empty()).await;
    assert_eq!(*outcomes.lock(), vec![Some("decoy".to_string())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn preprocessed_event_is_what_listeners_observe() {
    let hub = EventHub::new();
    hub.register_preprocessor(|mut event: Event| {
        if event.event_type == "raw" {
            event.event_type = "cooked".to_string();
        }
        event
    });

    let cooked = register_listening(&hub, StubExtension::new("com.test.a"), "cooked", "s").await;
    let raw = register_listening(&hub, StubExtension::new("com.test.b"), "raw", "s").await;

    hub.start();
    hub.dispatch(Event::new("e", "raw", "s"));

    wait_until(|| !cooked.lock().is_empty()).await;
    assert!(raw.lock().is_empty());
}
