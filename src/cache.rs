//! In-memory cache with per-entry time-to-live.
//!
//! Values are stored behind an `Arc` and swapped whole, so a reader sees
//! either the previous value or the new one, never a mix. Concurrent writers
//! for the same key simply overwrite each other.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

struct Slot<V> {
    value: Arc<V>,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> Slot<V> {
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.age(now) >= self.ttl
    }
}

pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Slot<V>>>,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the live value for `key` and how long ago it was stored.
    /// Expired entries read as absent.
    pub fn get(&self, key: &K) -> Option<(Arc<V>, Duration)> {
        let now = Instant::now();
        let guard = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        guard
            .get(key)
            .filter(|slot| !slot.is_expired(now))
            .map(|slot| (Arc::clone(&slot.value), slot.age(now)))
    }

    /// Stores `value`, replacing whatever was cached for `key`.
    /// Expired entries are dropped opportunistically on every write.
    pub fn put(&self, key: K, value: V, ttl: Duration) -> Arc<V> {
        let value = Arc::new(value);
        let now = Instant::now();
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        guard.retain(|_, slot| !slot.is_expired(now));
        guard.insert(
            key,
            Slot {
                value: Arc::clone(&value),
                inserted_at: now,
                ttl,
            },
        );

        value
    }

    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|slot| slot.value)
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of stored entries, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
