//! Thread-safe holder for the most recent game snapshot

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::snapshot::GameSnapshot;

pub const DEFAULT_STALENESS: Duration = Duration::from_secs(10);

#[derive(Debug)]
struct Entry {
    snapshot: Arc<GameSnapshot>,
    received_at: Instant,
}

/// Result of reading the store: the latest snapshot, if any, and whether it is too old to trust.
#[derive(Debug, Clone)]
pub struct SnapshotRead {
    pub snapshot: Option<Arc<GameSnapshot>>,
    pub is_stale: bool,
}

/// Shared between the GSI listener (writer) and the driver (reader).
///
/// Snapshots are swapped in as a whole behind an `Arc`, so a reader only ever
/// observes a complete snapshot. Cloning the store clones the handle.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: Arc<Mutex<Option<Entry>>>,
    staleness: Duration,
}

impl SnapshotStore {
    pub fn new(staleness: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            staleness,
        }
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    fn lock(&self) -> MutexGuard<'_, Option<Entry>> {
        // Entries are swapped whole, so a poisoned lock still holds a complete entry.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self, snapshot: GameSnapshot) {
        self.write_at(snapshot, Instant::now());
    }

    pub fn write_at(&self, snapshot: GameSnapshot, received_at: Instant) {
        let entry = Entry {
            snapshot: Arc::new(snapshot),
            received_at,
        };
        *self.lock() = Some(entry);
    }

    /// Forget the stored snapshot, e.g. after the feed sent something unusable.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    pub fn read(&self) -> SnapshotRead {
        self.read_at(Instant::now())
    }

    pub fn read_at(&self, now: Instant) -> SnapshotRead {
        let guard = self.lock();
        match guard.as_ref() {
            Some(entry) => SnapshotRead {
                snapshot: Some(Arc::clone(&entry.snapshot)),
                is_stale: now.saturating_duration_since(entry.received_at) > self.staleness,
            },
            None => SnapshotRead {
                snapshot: None,
                is_stale: false,
            },
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsi::snapshot::GameState;

    fn in_match() -> GameSnapshot {
        GameSnapshot {
            game_state: GameState::InProgress,
            hero: Some("hero_atlas".to_string()),
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn empty_store_reads_absent_and_fresh() {
        let store = SnapshotStore::default();
        let read = store.read();
        assert!(read.snapshot.is_none());
        assert!(!read.is_stale);
    }

    #[test]
    fn staleness_is_computed_at_read_time() {
        let store = SnapshotStore::new(Duration::from_secs(10));
        let t0 = Instant::now();
        store.write_at(in_match(), t0);

        assert!(!store.read_at(t0 + Duration::from_secs(10)).is_stale);
        let late = store.read_at(t0 + Duration::from_secs(11));
        assert!(late.is_stale);
        assert_eq!(late.snapshot.as_deref(), Some(&in_match()));
    }

    #[test]
    fn write_replaces_rather_than_merges() {
        let store = SnapshotStore::default();
        store.write(in_match());
        store.write(GameSnapshot::default());

        let read = store.read();
        assert_eq!(read.snapshot.as_deref(), Some(&GameSnapshot::default()));
    }

    #[test]
    fn invalidate_clears_the_snapshot() {
        let store = SnapshotStore::default();
        store.write(in_match());
        store.invalidate();
        assert!(store.read().snapshot.is_none());
    }

    #[test]
    fn concurrent_writers_never_tear_a_snapshot() {
        let store = SnapshotStore::default();
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..500u32 {
                    store.write(GameSnapshot {
                        level: Some(i),
                        souls: Some(u64::from(i) * 10),
                        ..GameSnapshot::default()
                    });
                }
            })
        };

        for _ in 0..500 {
            if let Some(snapshot) = store.read().snapshot {
                let level = snapshot.level.unwrap();
                assert_eq!(snapshot.souls, Some(u64::from(level) * 10));
            }
        }
        writer.join().unwrap();
    }
}
