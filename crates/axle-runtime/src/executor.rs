//! Serial executor: the hub's control lane primitive.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send>;

/// A single-worker FIFO job lane.
///
/// Jobs submitted through [`execute`](Self::execute) run one at a time, in
/// submission order, on a dedicated worker task. The hub serializes
/// registration, unregistration, `start`, and hub-state publication through
/// one of these so no two of them ever run concurrently.
///
/// The worker is spawned at construction, so `new` must be called within a
/// Tokio runtime.
pub struct SerialExecutor {
    name: String,
    tx: Mutex<Option<mpsc::UnboundedSender<Job>>>,
}

impl SerialExecutor {
    /// Creates the lane and spawns its worker. The name is for logging only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let worker_name = name.clone();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job();
            }
            debug!(lane = %worker_name, "serial executor stopped");
        });

        Self {
            name,
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Enqueues a job to run after all previously submitted jobs.
    ///
    /// Jobs submitted after [`shutdown`](Self::shutdown) are dropped with a
    /// warning.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        let tx = self.tx.lock();
        match tx.as_ref() {
            Some(tx) => {
                let _ = tx.send(Box::new(job));
            }
            None => warn!(lane = %self.name, "job dropped: serial executor is shut down"),
        }
    }

    /// Stops accepting jobs. Already-queued jobs still run.
    pub fn shutdown(&self) {
        self.tx.lock().take();
    }
}
