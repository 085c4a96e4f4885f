//! Response-listener entries and the pending shared-state resolver.

use crate::hub::EventHub;
use axle_event::Event;
use axle_types::EventId;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One-shot callback awaiting a response event or a timeout.
///
/// Invoked with `Some(event)` when the matching response arrives before the
/// deadline, or `None` when the timeout fires first.
pub type ResponseListener = Box<dyn FnOnce(Option<Event>) + Send>;

/// A registered response listener awaiting the response to one trigger.
///
/// Shared between the global event handler and the timeout scheduler;
/// whichever fires first removes the entry from the table, so the listener
/// runs exactly once.
pub(crate) struct ResponseEntry {
    /// Distinguishes entries that share a trigger id.
    pub id: u64,
    /// Id of the trigger event this entry responds to.
    pub trigger_id: EventId,
    pub listener: ResponseListener,
    /// Timeout task, aborted when the response arrives first. `None` only
    /// in the window before the task is recorded.
    pub timeout: Option<JoinHandle<()>>,
}

/// One-shot resolver returned by a pending shared-state reservation.
///
/// Holds only a weak reference to the hub, so an outstanding resolver does
/// not keep a discarded hub alive. Resolving publishes the data at the
/// reserved version and dispatches a state-change notification.
pub struct SharedStateResolver {
    hub: Weak<EventHub>,
    state_name: String,
    version: u64,
    resolved: AtomicBool,
}

impl SharedStateResolver {
    pub(crate) fn new(hub: Weak<EventHub>, state_name: String, version: u64) -> Self {
        Self {
            hub,
            state_name,
            version,
            resolved: AtomicBool::new(false),
        }
    }

    /// The version reserved for this pending state.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Publishes `data` at the reserved version.
    ///
    /// Only the first call has an effect; later calls are dropped with a
    /// warning. A resolver that outlives its hub is a silent no-op.
    pub fn resolve(&self, data: Value) {
        if self.resolved.swap(true, Ordering::SeqCst) {
            warn!(
                state = %self.state_name,
                version = self.version,
                "pending state already resolved"
            );
            return;
        }
        let Some(hub) = self.hub.upgrade() else {
            debug!(
                state = %self.state_name,
                version = self.version,
                "pending state resolved after hub shutdown"
            );
            return;
        };
        hub.resolve_pending_state(&self.state_name, self.version, data);
    }
}
