//! Concurrent TTL storage for pastes.

use crate::ident;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One stored paste: immutable payload plus its absolute expiry instant.
#[derive(Debug, Clone)]
pub struct Entry {
    text: Arc<str>,
    expires_at: Instant,
}

impl Entry {
    fn new(text: &str, expires_at: Instant) -> Self {
        Self {
            text: Arc::from(text),
            expires_at,
        }
    }

    /// Shared handle to the payload.
    pub fn text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Absolute expiry instant, fixed at insertion.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// Concurrent mapping from identifier to stored paste with TTL eviction.
///
/// Entries are removed only by [`sweep`](Self::sweep); a read between an
/// entry's expiry and the next sweep still observes it, so staleness is
/// bounded by the sweep cadence. The sharded map gives per-key atomicity:
/// no reader ever observes a partially written entry, and the sweep runs
/// concurrently with reads and writes.
#[derive(Debug, Default)]
pub struct ExpiringStore {
    entries: DashMap<String, Entry>,
}

impl ExpiringStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `id`, expiring `ttl` from now.
    ///
    /// A colliding `id` silently replaces the older paste; callers are
    /// expected to pick ids unlikely to collide. See
    /// [`insert_generated`](Self::insert_generated) for the retrying
    /// variant.
    pub fn put(&self, id: &str, text: &str, ttl: Duration) {
        // Clock read stays outside the shard lock.
        let expires_at = Instant::now() + ttl;
        self.entries
            .insert(id.to_string(), Entry::new(text, expires_at));
    }

    /// Insert only when `id` is vacant. Returns whether the insert happened.
    ///
    /// The check and the insert are one atomic step on the key's shard, so
    /// two racing callers cannot both claim the same id.
    pub fn put_if_absent(&self, id: &str, text: &str, ttl: Duration) -> bool {
        let expires_at = Instant::now() + ttl;
        match self.entries.entry(id.to_string()) {
            MapEntry::Occupied(_) => false,
            MapEntry::Vacant(slot) => {
                slot.insert(Entry::new(text, expires_at));
                true
            }
        }
    }

    /// Store `text` under a freshly generated identifier and return the id.
    ///
    /// With `collision_retries == 0` the first generated id is used blindly
    /// and a collision overwrites the older paste. A positive budget
    /// instead claims a vacant id, regenerating up to that many times
    /// before falling back to an overwrite, so the operation always
    /// succeeds.
    pub fn insert_generated(&self, text: &str, ttl: Duration, collision_retries: u32) -> String {
        for _ in 0..collision_retries {
            let id = ident::generate();
            if self.put_if_absent(&id, text, ttl) {
                return id;
            }
            tracing::warn!(%id, "generated id already taken, retrying");
        }
        let id = ident::generate();
        self.put(&id, text, ttl);
        id
    }

    /// Fetch the payload stored under `id`.
    ///
    /// Presence is judged purely by map membership: an entry whose expiry
    /// has passed but which the sweep has not yet reclaimed is still
    /// returned. Absence is a valid outcome, not an error.
    pub fn get(&self, id: &str) -> Option<Arc<str>> {
        self.entries.get(id).map(|entry| entry.text())
    }

    /// Remove every entry whose expiry is at or before `now`.
    ///
    /// Returns the number of entries removed. The caller-supplied `now` is
    /// the single snapshot every entry is compared against; an entry
    /// inserted while the sweep runs survives unless it was already expired
    /// at that instant.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut removed = 0usize;
        self.entries.retain(|_, entry| {
            if entry.expires_at <= now {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of entries currently held, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const TTL: Duration = Duration::from_secs(100);

    #[test]
    fn round_trip() {
        let store = ExpiringStore::new();
        store.put("k1", "hello", TTL);
        assert_eq!(store.get("k1").as_deref(), Some("hello"));
    }

    #[test]
    fn absent_id_reads_as_none() {
        let store = ExpiringStore::new();
        assert!(store.get("nothing").is_none());
    }

    #[test]
    fn last_write_wins_on_overwrite() {
        let store = ExpiringStore::new();
        store.put("k4", "a", TTL);
        store.put("k4", "b", TTL);
        assert_eq!(store.get("k4").as_deref(), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_removes_expired_entries() {
        let store = ExpiringStore::new();
        store.put("k2", "x", Duration::ZERO);
        let removed = store.sweep(Instant::now());
        assert_eq!(removed, 1);
        assert!(store.get("k2").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_never_evicts_live_entries() {
        let store = ExpiringStore::new();
        store.put("k3", "x", Duration::from_secs(3600));
        assert_eq!(store.sweep(Instant::now()), 0);
        assert_eq!(store.get("k3").as_deref(), Some("x"));
    }

    #[test]
    fn expired_entries_stay_visible_until_swept() {
        let store = ExpiringStore::new();
        store.put("stale", "x", Duration::ZERO);
        // Removal is the sweep's job; a read beforehand still sees it.
        assert_eq!(store.get("stale").as_deref(), Some("x"));
        store.sweep(Instant::now());
        assert!(store.get("stale").is_none());
    }

    #[test]
    fn put_if_absent_refuses_occupied_ids() {
        let store = ExpiringStore::new();
        assert!(store.put_if_absent("id", "first", TTL));
        assert!(!store.put_if_absent("id", "second", TTL));
        assert_eq!(store.get("id").as_deref(), Some("first"));
    }

    #[test]
    fn insert_generated_returns_a_stored_id() {
        let store = ExpiringStore::new();
        for retries in [0, 3] {
            let id = store.insert_generated("payload", TTL, retries);
            assert_eq!(id.len(), crate::ident::ID_LEN);
            assert_eq!(store.get(&id).as_deref(), Some("payload"));
        }
    }

    #[test]
    fn concurrent_puts_and_gets_with_interleaved_sweeps() {
        let store = Arc::new(ExpiringStore::new());
        let mut handles = Vec::new();

        for thread_id in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let id = format!("t{}k{}", thread_id, i);
                    let text = format!("payload-{}-{}", thread_id, i);
                    store.put(&id, &text, TTL);
                    // Each reader must see exactly its own write, never a
                    // torn value or another thread's text.
                    assert_eq!(store.get(&id).as_deref(), Some(text.as_str()));
                }
            }));
        }

        let sweeper_store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                sweeper_store.sweep(Instant::now());
            }
        }));

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        // Nothing was close to expiry, so sweeps removed nothing.
        assert_eq!(store.len(), 800);
    }

    #[test]
    fn sweep_reports_removed_count() {
        let store = ExpiringStore::new();
        for i in 0..5 {
            store.put(&format!("dead{}", i), "x", Duration::ZERO);
        }
        for i in 0..3 {
            store.put(&format!("live{}", i), "x", TTL);
        }
        assert_eq!(store.sweep(Instant::now()), 5);
        assert_eq!(store.len(), 3);
    }
}
