//! Buffer for writes deferred by disconnection.
//!
//! [`Backlog`] holds the entries that arrived while the station was
//! disconnected. [`add`](Backlog::add) appends under a mutex;
//! [`drain_and_reset`](Backlog::drain_and_reset) exchanges the buffer for a
//! fresh empty one under the same mutex, so an add racing a drain lands in
//! exactly one of the snapshot or the new store — never lost, never seen
//! twice.
//!
//! # Limitations
//!
//! The backlog is pure in-memory state: buffered entries do not survive a
//! process restart. That matches the source system and is a documented
//! limitation, not an oversight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use station_gateway::LedgerEntry;

/// One buffered write, owned exclusively by the backlog until drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogRecord {
    /// The entry to submit once connectivity returns.
    pub entry: LedgerEntry,
    /// When the entry was buffered. Informational only, for replay logs.
    pub queued_at: DateTime<Utc>,
}

impl BacklogRecord {
    /// Buffers the given entry, stamping it with the current time.
    #[must_use]
    pub fn new(entry: LedgerEntry) -> Self {
        Self { entry, queued_at: Utc::now() }
    }
}

/// Shared backlog of deferred writes.
///
/// Cheaply cloneable; all clones share the same buffer. No I/O or await
/// happens under the lock, so a synchronous mutex is sufficient even though
/// callers live on async tasks.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    records: Arc<Mutex<Vec<BacklogRecord>>>,
}

impl Backlog {
    /// Creates an empty backlog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record. Never rejects; O(1) amortized.
    pub fn add(&self, record: BacklogRecord) {
        self.records.lock().push(record);
    }

    /// Atomically takes every buffered record and installs a fresh empty
    /// buffer for subsequent [`add`](Self::add) calls.
    ///
    /// The swap happens under the same lock `add` uses, so no record can be
    /// lost or duplicated across the drain boundary.
    #[must_use]
    pub fn drain_and_reset(&self) -> Vec<BacklogRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Returns the number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(user_id: &str, unique_id: &str) -> LedgerEntry {
        LedgerEntry {
            user_id: user_id.into(),
            change: "1".into(),
            unique_id: unique_id.into(),
            user_key: "key".into(),
        }
    }

    #[test]
    fn add_then_drain_returns_everything() {
        let backlog = Backlog::new();
        backlog.add(BacklogRecord::new(entry("alice", "u1")));
        backlog.add(BacklogRecord::new(entry("bob", "u2")));
        assert_eq!(backlog.len(), 2);

        let snapshot = backlog.drain_and_reset();
        assert_eq!(snapshot.len(), 2);
        assert!(backlog.is_empty());
    }

    #[test]
    fn drain_of_empty_backlog_is_empty() {
        let backlog = Backlog::new();
        assert!(backlog.drain_and_reset().is_empty());
    }

    #[test]
    fn adds_after_drain_land_in_the_new_buffer() {
        let backlog = Backlog::new();
        backlog.add(BacklogRecord::new(entry("alice", "u1")));

        let snapshot = backlog.drain_and_reset();
        assert_eq!(snapshot.len(), 1);

        backlog.add(BacklogRecord::new(entry("bob", "u2")));
        assert_eq!(backlog.len(), 1);
    }

    #[test]
    fn clones_share_the_buffer() {
        let backlog = Backlog::new();
        let clone = backlog.clone();

        backlog.add(BacklogRecord::new(entry("alice", "u1")));
        assert_eq!(clone.len(), 1);
    }

    /// Every record added concurrently with a drain must end up in exactly
    /// one of the snapshot or the post-drain store.
    #[test]
    fn concurrent_adds_are_never_lost_or_duplicated() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 250;

        let backlog = Backlog::new();

        let writers: Vec<_> = (0..WRITERS)
            .map(|w| {
                let backlog = backlog.clone();
                std::thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        backlog.add(BacklogRecord::new(entry("alice", &format!("{w}-{i}"))));
                    }
                })
            })
            .collect();

        // Drain repeatedly while the writers are running.
        let mut drained = Vec::new();
        for _ in 0..50 {
            drained.extend(backlog.drain_and_reset());
            std::thread::yield_now();
        }

        for writer in writers {
            writer.join().unwrap();
        }
        drained.extend(backlog.drain_and_reset());

        assert_eq!(drained.len(), WRITERS * PER_WRITER);

        let mut ids: Vec<_> = drained.iter().map(|r| r.entry.unique_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), WRITERS * PER_WRITER);
    }
}
