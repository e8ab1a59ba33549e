//! Cache Store Module
//!
//! Unsynchronized cache engine: the key index and the expiration heap kept
//! in lock-step. `TtlCache` wraps one of these in a single mutex.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::entry::CacheEntry;
use crate::cache::heap::{ExpirationIndex, SlotId};
use crate::cache::CacheStats;

// == Cache Store ==
/// Key index plus expiration heap, with capacity and TTL policy.
///
/// Methods take the current clock reading and hand back removed values
/// instead of invoking callbacks, so the caller decides what to do with them.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to arena slot
    keys: HashMap<K, SlotId>,
    /// Entries ordered by expiration
    expirations: ExpirationIndex<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: NonZeroUsize,
    /// Life granted on every insert and refresh
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            keys: HashMap::with_capacity(capacity.get()),
            expirations: ExpirationIndex::with_capacity(capacity.get()),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Put ==
    /// Stores a key-value pair expiring `ttl` after `now`.
    ///
    /// An existing key has its value overwritten and its life refreshed; the
    /// old value is dropped and nothing is evicted. A new key arriving at
    /// capacity evicts exactly one entry first, whose value is returned.
    pub fn put(&mut self, key: K, value: V, now: Duration) -> Option<V> {
        if let Some(&slot) = self.keys.get(&key) {
            if let Some(entry) = self.expirations.get_mut(slot) {
                entry.value = value;
                entry.refresh(now, self.ttl);
            }
            self.expirations.fix(slot, now);
            trace!("refreshed entry on overwrite");
            return None;
        }

        let evicted = if self.keys.len() >= self.capacity.get() {
            Some(self.evict(now))
        } else {
            None
        };

        let entry = CacheEntry::new(key.clone(), value, now, self.ttl);
        let slot = self.expirations.push(entry, now);
        self.keys.insert(key, slot);
        self.stats.set_total_entries(self.keys.len());

        evicted
    }

    // == Get ==
    /// Looks up a key, refreshing its life on a hit.
    ///
    /// An entry past its TTL that has not been evicted yet is still a hit and
    /// gets a fresh TTL.
    pub fn get<Q>(&mut self, key: &Q, now: Duration) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&slot) = self.keys.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if let Some(entry) = self.expirations.get_mut(slot) {
            entry.refresh(now, self.ttl);
        }
        self.expirations.fix(slot, now);
        self.stats.record_hit();
        trace!("refreshed entry on hit");

        self.expirations.get(slot).map(|entry| &entry.value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    pub fn remove<Q>(&mut self, key: &Q, now: Duration) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.keys.remove(key)?;
        let entry = self.expirations.remove(slot, now)?;
        self.stats.record_removal();
        self.stats.set_total_entries(self.keys.len());
        trace!("removed entry");
        Some(entry.value)
    }

    // == Purge Expired ==
    /// Pops every entry whose TTL has lapsed and returns their values.
    pub fn purge_expired(&mut self, now: Duration) -> Vec<V> {
        let mut purged = Vec::new();
        while self
            .expirations
            .peek()
            .is_some_and(|entry| entry.is_expired(now))
        {
            let Some(entry) = self.expirations.pop(now) else {
                break;
            };
            self.keys.remove(&entry.key);
            purged.push(entry.value);
        }

        if !purged.is_empty() {
            self.stats.record_purged(purged.len());
            self.stats.set_total_entries(self.keys.len());
            debug!(purged = purged.len(), resident = self.keys.len(), "purged expired entries");
        }
        purged
    }

    /// Evicts the heap minimum. Only called with the store at capacity.
    fn evict(&mut self, now: Duration) -> V {
        let Some(entry) = self.expirations.pop(now) else {
            panic!("evict called on an empty cache");
        };
        self.keys.remove(&entry.key);

        let expired = entry.is_expired(now);
        self.stats.record_eviction(expired);
        debug!(expired, resident = self.keys.len(), "evicted entry to make room");
        entry.value
    }

    // == Contains ==
    /// Checks membership without refreshing.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains_key(key)
    }

    /// Remaining life of an entry, without refreshing it.
    pub fn expires_in<Q>(&self, key: &Q, now: Duration) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.keys.get(key)?;
        self.expirations
            .get(slot)
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.keys.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    // == Settings ==
    /// Maximum number of resident entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Lifetime granted to an entry on every insert or refresh.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Panics unless both indexes hold the same keys and the heap is sound.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, now: Duration) {
        assert_eq!(self.keys.len(), self.expirations.len(), "index sizes differ");
        assert!(self.keys.len() <= self.capacity.get(), "over capacity");
        for (key, &slot) in &self.keys {
            let entry = self.expirations.get(slot);
            assert!(
                entry.is_some_and(|entry| &entry.key == key),
                "key index points at the wrong entry"
            );
        }
        self.expirations.assert_invariants(now);
    }
}
