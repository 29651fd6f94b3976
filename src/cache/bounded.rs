//! Fixed-capacity LRU cache with hit/miss accounting.
//!
//! Recency is a monotonically increasing tick per entry; a `BTreeMap` from tick to key gives the
//! least-recently-used entry in `O(log n)`. All bookkeeping sits behind one mutex so concurrent
//! `get`/`set` calls can never tear recency order or counters.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::trace;

use super::types::CacheStats;

struct Slot<V> {
    value: V,
    tick: u64,
}

struct Inner<K, V> {
    entries: HashMap<K, Slot<V>>,
    recency: BTreeMap<u64, K>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V> Inner<K, V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_lru(&mut self) -> Option<K> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// In-memory LRU cache bounded to `max_size` entries.
///
/// A `max_size` of zero disables caching: `set` is a no-op and every `get` is a miss.
pub struct BoundedCache<K, V> {
    name: String,
    max_size: usize,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_size: usize) -> Self {
        Self::named("cache", max_size)
    }

    /// Creates a cache with a diagnostic name (used in logs and sweep reports).
    pub fn named(name: impl Into<String>, max_size: usize) -> Self {
        Self {
            name: name.into(),
            max_size,
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(max_size.min(1024)),
                recency: BTreeMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns a clone of the value and promotes the entry to most-recently-used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut guard = self.inner.lock();
        let tick = guard.next_tick();
        let inner = &mut *guard;

        let Some(slot) = inner.entries.get_mut(key) else {
            inner.misses += 1;
            return None;
        };
        let old_tick = std::mem::replace(&mut slot.tick, tick);
        let value = slot.value.clone();

        // The recency index owns a copy of every key, so re-link it under the new tick.
        if let Some(owned) = inner.recency.remove(&old_tick) {
            inner.recency.insert(tick, owned);
        }
        inner.hits += 1;

        Some(value)
    }

    /// Inserts or replaces a value, evicting the least-recently-used entry when full.
    pub fn set(&self, key: K, value: V) {
        if self.max_size == 0 {
            return;
        }

        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if let Some(slot) = inner.entries.get_mut(&key) {
            let old_tick = slot.tick;
            slot.value = value;
            slot.tick = tick;
            inner.recency.remove(&old_tick);
            inner.recency.insert(tick, key);
            return;
        }

        if inner.entries.len() >= self.max_size && inner.evict_lru().is_some() {
            trace!(cache = %self.name, "evicted least-recently-used entry");
        }

        inner.recency.insert(tick, key.clone());
        inner.entries.insert(key, Slot { value, tick });
    }

    /// Removes one entry, returning its value.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let mut inner = self.inner.lock();
        let slot = inner.entries.remove(key)?;
        inner.recency.remove(&slot.tick);
        Some(slot.value)
    }

    /// Returns `true` if `key` is cached, without touching recency or counters.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.lock().entries.contains_key(key)
    }

    /// Removes every entry and resets the hit/miss counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.recency.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys ordered from least- to most-recently-used.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().recency.values().cloned().collect()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats::new(
            inner.entries.len(),
            self.max_size,
            inner.hits,
            inner.misses,
        )
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BoundedCache")
            .field("name", &self.name)
            .field("size", &inner.entries.len())
            .field("max_size", &self.max_size)
            .field("hits", &inner.hits)
            .field("misses", &inner.misses)
            .finish()
    }
}
