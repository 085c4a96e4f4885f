//! Single-consumer ordered queue with a pluggable handler.
//!
//! [`OperationOrderer`] is the serial lane primitive behind both the hub's
//! global event stream and each extension container's private queue. Items
//! are handed to the handler in the exact order they were added, one at a
//! time; a handler that returns `false` leaves the item at the head of the
//! queue for a later retry.
//!
//! ```text
//! add(item) ──► [ item3 | item2 | item1 ] ──► handler(item) -> bool
//!                     (FIFO, unbounded)        │
//!                                              ├─ true  : consumed
//!                                              └─ false : retained at head,
//!                                                 retried on next add/start
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handler invoked with each queued item.
///
/// Returning `true` consumes the item; returning `false` retains it at the
/// head of the queue for redelivery after the next `add` or `start`.
pub type OrderedHandler<T> = Box<dyn FnMut(&T) -> bool + Send>;

/// Drain state of an orderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdererState {
    /// Created; not draining yet.
    Idle,
    /// Draining items as they arrive.
    Running,
    /// Retaining items; the in-flight item (if any) still completes.
    Paused,
}

/// A single-consumer FIFO with cooperative backpressure.
///
/// Exactly one handler invocation is live at a time per orderer; items are
/// delivered in insertion order. The worker task is spawned on the first
/// [`start`](Self::start), so `start` must be called within a Tokio runtime.
pub struct OperationOrderer<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    name: String,
    queue: Mutex<VecDeque<T>>,
    state: Mutex<OrdererState>,
    handler: Mutex<Option<OrderedHandler<T>>>,
    wake: Notify,
    cancel: CancellationToken,
    worker_spawned: Mutex<bool>,
}

impl<T: Send + 'static> OperationOrderer<T> {
    /// Creates an idle orderer. The name is used for logging only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                queue: Mutex::new(VecDeque::new()),
                state: Mutex::new(OrdererState::Idle),
                handler: Mutex::new(None),
                wake: Notify::new(),
                cancel: CancellationToken::new(),
                worker_spawned: Mutex::new(false),
            }),
        }
    }

    /// Installs the handler. Must be called before [`start`](Self::start).
    pub fn set_handler(&self, handler: OrderedHandler<T>) {
        *self.inner.handler.lock() = Some(handler);
    }

    /// Enqueues an item; wakes the worker if the orderer is running.
    ///
    /// Items added after [`shutdown`](Self::shutdown) are dropped.
    pub fn add(&self, item: T) {
        if self.inner.cancel.is_cancelled() {
            warn!(orderer = %self.inner.name, "item dropped: orderer is shut down");
            return;
        }
        self.inner.queue.lock().push_back(item);
        self.inner.wake.notify_one();
    }

    /// Begins (or resumes) draining.
    ///
    /// Calling `start` while already running re-ticks the worker, retrying
    /// an item a previous handler invocation refused.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.lock();
            if *state != OrdererState::Running {
                debug!(orderer = %self.inner.name, from = ?*state, "orderer running");
                *state = OrdererState::Running;
            }
        }
        self.spawn_worker();
        self.inner.wake.notify_one();
    }

    /// Stops pulling new items. The in-flight item, if any, completes.
    pub fn pause(&self) {
        let mut state = self.inner.state.lock();
        if *state == OrdererState::Running {
            debug!(orderer = %self.inner.name, "orderer paused");
            *state = OrdererState::Paused;
        }
    }

    /// Returns the current drain state.
    #[must_use]
    pub fn state(&self) -> OrdererState {
        *self.inner.state.lock()
    }

    /// Returns the number of queued items, including a retained head.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Returns `true` if no items are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.queue.lock().is_empty()
    }

    /// Cancels the worker and discards all pending items. Terminal.
    pub fn shutdown(&self) {
        let discarded = {
            let mut queue = self.inner.queue.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        if discarded > 0 {
            debug!(orderer = %self.inner.name, discarded, "discarding pending items");
        }
        self.inner.cancel.cancel();
    }

    fn spawn_worker(&self) {
        let mut spawned = self.inner.worker_spawned.lock();
        if *spawned {
            return;
        }
        *spawned = true;
        tokio::spawn(Inner::run(Arc::clone(&self.inner)));
    }
}

impl<T> Drop for OperationOrderer<T> {
    fn drop(&mut self) {
        self.inner.cancel.cancel();
    }
}

impl<T: Send + 'static> Inner<T> {
    async fn run(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = self.wake.notified() => {}
            }
            self.drain();
        }
        debug!(orderer = %self.name, "orderer worker stopped");
    }

    /// Pulls items while running; stops on an empty queue, a refused item,
    /// a pause, or cancellation.
    fn drain(&self) {
        let mut guard = self.handler.lock();
        let Some(handler) = guard.as_mut() else {
            return;
        };

        loop {
            if self.cancel.is_cancelled() || *self.state.lock() != OrdererState::Running {
                return;
            }

            let Some(item) = self.queue.lock().pop_front() else {
                return;
            };

            if !handler(&item) {
                self.queue.lock().push_front(item);
                return;
            }
        }
    }
}
