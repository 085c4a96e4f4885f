//! Monotonic sequence counter for event numbering.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces monotonically increasing event sequence numbers.
///
/// Every call to [`increment_and_get`](Self::increment_and_get) returns a
/// value strictly greater than any previously returned value, totally
/// ordered across concurrent callers. Sequence 0 is reserved to mean
/// "before any event" and is never returned.
#[derive(Debug, Default)]
pub struct SequenceCounter(AtomicU64);

impl SequenceCounter {
    /// Creates a counter starting before the first sequence number.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Advances the counter and returns the new value.
    pub fn increment_and_get(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the most recently issued value, or 0 if none was issued.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_before_any_event() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.increment_and_get(), 1);
        assert_eq!(counter.increment_and_get(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn strictly_increasing_across_threads() {
        let counter = Arc::new(SequenceCounter::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(std::thread::spawn(move || {
                (0..1000).map(|_| counter.increment_and_get()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread"))
            .collect();
        all.sort_unstable();
        all.dedup();

        // 8000 distinct values, none of them zero.
        assert_eq!(all.len(), 8000);
        assert_eq!(all.first(), Some(&1));
        assert_eq!(all.last(), Some(&8000));
    }
}
