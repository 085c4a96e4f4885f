//! Append-only shared-state timeline for one extension.

use super::{SharedStateResult, SharedStateStatus};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone)]
enum Entry {
    Pending,
    Set(Value),
}

/// Ordered map from version to state entry for a single extension.
///
/// Versions are event sequence numbers (or 0 for "before any event") and
/// strictly increase along the timeline. The only permitted mutation of an
/// existing entry is replacing a `Pending` with a `Set` at the same version;
/// the timeline never shrinks.
///
/// Mutations arrive through the owning extension's worker or the hub's
/// write paths; reads may come from any thread and observe a consistent
/// snapshot.
#[derive(Debug)]
pub struct SharedStateTimeline {
    name: String,
    entries: RwLock<BTreeMap<u64, Entry>>,
}

impl SharedStateTimeline {
    /// Creates an empty timeline. The name is used for logging only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Reserves a pending entry at `version`.
    ///
    /// No-op with a warning if `version` is not strictly greater than every
    /// existing version.
    pub fn add_pending(&self, version: u64) {
        let mut entries = self.entries.write();
        if let Some((&latest, _)) = entries.last_key_value() {
            if version <= latest {
                warn!(
                    timeline = %self.name,
                    version, latest, "ignoring stale pending state version"
                );
                return;
            }
        }
        entries.insert(version, Entry::Pending);
    }

    /// Publishes a state snapshot at `version`.
    ///
    /// Replaces a pending entry reserved at the same version; otherwise
    /// appends, subject to the monotonicity rule (stale versions are dropped
    /// with a warning).
    pub fn set(&self, version: u64, data: Value) {
        let mut entries = self.entries.write();
        if entries.contains_key(&version) {
            entries.insert(version, Entry::Set(data));
            return;
        }
        if let Some((&latest, _)) = entries.last_key_value() {
            if version <= latest {
                warn!(
                    timeline = %self.name,
                    version, latest, "ignoring stale state version"
                );
                return;
            }
        }
        entries.insert(version, Entry::Set(data));
    }

    /// Resolves a previously reserved pending entry with its data.
    ///
    /// No-op with a warning if no pending entry exists at `version`.
    pub fn update_pending(&self, version: u64, data: Value) {
        let mut entries = self.entries.write();
        match entries.get(&version) {
            Some(Entry::Pending) => {
                entries.insert(version, Entry::Set(data));
            }
            Some(Entry::Set(_)) => {
                warn!(
                    timeline = %self.name,
                    version, "pending update ignored: version already set"
                );
            }
            None => {
                warn!(
                    timeline = %self.name,
                    version, "pending update ignored: no entry at version"
                );
            }
        }
    }

    /// Resolves `version` to the entry with the greatest version ≤ it.
    #[must_use]
    pub fn resolve(&self, version: u64) -> SharedStateResult {
        let entries = self.entries.read();
        match entries.range(..=version).next_back() {
            Some((_, Entry::Set(data))) => {
                SharedStateResult::new(SharedStateStatus::Set, Some(data.clone()))
            }
            Some((_, Entry::Pending)) => {
                SharedStateResult::new(SharedStateStatus::Pending, None)
            }
            None => SharedStateResult::none(),
        }
    }

    /// Returns `true` if no entry has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
