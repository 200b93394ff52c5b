//! Concurrent store of per-correlation-id start/end timestamps.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;

#[cfg(test)]
mod tests;

/// Start/end timestamp pair for one fired request.
///
/// Created when the request is dispatched, closed at most once when its
/// callback arrives, read-only afterward.
#[derive(Clone, Copy, Debug)]
pub struct TrackerEntry {
    pub start: Instant,
    pub end: Option<Instant>,
}

impl TrackerEntry {
    #[must_use]
    pub fn latency(&self) -> Option<Duration> {
        self.end.map(|end| end.saturating_duration_since(self.start))
    }
}

/// Concurrency-safe mapping from correlation id to [`TrackerEntry`].
///
/// Firer tasks create entries, receiver handlers close them. Every access
/// goes through the same lock, full snapshots included, so a snapshot can
/// never observe a torn map while writers are active.
#[derive(Debug, Default)]
pub struct Tracker {
    entries: RwLock<HashMap<String, TrackerEntry>>,
}

impl Tracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_start(&self, id: &str, start: Instant) {
        self.write_entries()
            .insert(id.to_owned(), TrackerEntry { start, end: None });
    }

    /// Closes the entry for `id`. Returns false when the id is unknown or
    /// already closed; unknown ids create nothing, so late, duplicate, or
    /// foreign callbacks cannot corrupt the table.
    pub fn record_end(&self, id: &str, end: Instant) -> bool {
        let mut entries = self.write_entries();
        match entries.get_mut(id) {
            Some(entry) if entry.end.is_none() => {
                entry.end = Some(end);
                true
            }
            Some(_) | None => false,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<TrackerEntry> {
        self.read_entries().get(id).copied()
    }

    /// Clones the whole table under the read lock.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, TrackerEntry> {
        self.read_entries().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, TrackerEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, TrackerEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
