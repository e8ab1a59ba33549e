//! TTL Cache Module
//!
//! Thread-safe cache handle: one mutex around the store, a clock, and the
//! eviction callback.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, Clock, MonotonicClock};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Hook receiving every value that leaves the cache.
pub type EvictionCallback<V> = Box<dyn Fn(V) + Send + Sync>;

// == TTL Cache ==
/// A fixed-capacity cache evicting by TTL first and staleness second.
///
/// Every operation holds one exclusive lock for its whole duration, so
/// operations are linearizable across threads. There is no background
/// sweeper: entries past their TTL stay resident until a full cache needs
/// room, [`purge_expired`](Self::purge_expired) is called, or they are removed.
///
/// # Eviction callback
/// `on_evicted` receives the value of every entry that leaves the cache by
/// capacity eviction, [`remove`](Self::remove) or
/// [`purge_expired`](Self::purge_expired), exactly once. It is never called
/// on a refresh or on an overwriting `put`. The callback runs while the lock
/// is held: it must be quick and must not call back into the same cache,
/// which would deadlock.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru::TtlCache;
///
/// let cache = TtlCache::new(2, Duration::from_secs(60), |value: u32| {
///     println!("evicted {value}");
/// });
/// cache.put("a", 1);
/// assert_eq!(cache.get(&"a"), Some(1));
/// ```
pub struct TtlCache<K, V> {
    store: Mutex<CacheStore<K, V>>,
    on_evicted: EvictionCallback<V>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries, each living `ttl`
    /// past its last refresh.
    ///
    /// # Panics
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to get an
    /// error instead.
    pub fn new<F>(capacity: usize, ttl: Duration, on_evicted: F) -> Self
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        match Self::try_new(capacity, ttl, on_evicted) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache, rejecting a zero capacity.
    pub fn try_new<F>(capacity: usize, ttl: Duration, on_evicted: F) -> Result<Self>
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::ZeroCapacity)?;
        Ok(Self {
            store: Mutex::new(CacheStore::new(capacity, ttl)),
            on_evicted: Box::new(on_evicted),
            clock: Arc::new(MonotonicClock::new()),
        })
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config<F>(config: &Config, on_evicted: F) -> Result<Self>
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        Self::try_new(config.capacity, config.ttl(), on_evicted)
    }

    /// Replaces the time source.
    ///
    /// Meant to be called right after construction; entries already stored
    /// keep expiration times taken from the previous clock.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    // == Put ==
    /// Stores `value` under `key` with a fresh TTL.
    ///
    /// Overwriting an existing key never evicts. Inserting a new key into a
    /// full cache first evicts one entry: an expired one if any, otherwise the
    /// one refreshed longest ago.
    pub fn put(&self, key: K, value: V) {
        let mut store = self.store.lock();
        let now = self.clock.now();
        if let Some(evicted) = store.put(key, value, now) {
            (self.on_evicted)(evicted);
        }
    }

    // == Get ==
    /// Returns a copy of the value for `key`, refreshing its TTL on a hit.
    ///
    /// An entry that has outlived its TTL but has not been evicted yet is
    /// returned as a hit and gets a new TTL; expiry only decides who goes
    /// first when room is needed.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.get(key, now).cloned()
    }

    // == Remove ==
    /// Removes `key`, handing its value to the eviction callback.
    /// Missing keys are a no-op.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.lock();
        let now = self.clock.now();
        if let Some(removed) = store.remove(key, now) {
            (self.on_evicted)(removed);
        }
    }

    // == Purge Expired ==
    /// Drops every entry whose TTL has lapsed, calling the eviction callback
    /// for each. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut store = self.store.lock();
        let now = self.clock.now();
        let purged = store.purge_expired(now);
        let count = purged.len();
        for value in purged {
            (self.on_evicted)(value);
        }
        count
    }

    // == Inspection ==
    /// Checks membership without refreshing.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains(key)
    }

    /// Remaining life of `key` without refreshing it; zero once expired.
    pub fn expires_in<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let store = self.store.lock();
        let now = self.clock.now();
        store.expires_in(key, now)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    // == Settings ==
    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity().get()
    }

    /// Lifetime granted to an entry on every insert or refresh.
    pub fn ttl(&self) -> Duration {
        self.store.lock().ttl()
    }

    // == Stats ==
    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let store = self.store.lock();
        store.assert_invariants(self.clock.now());
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock();
        f.debug_struct("TtlCache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .field("ttl", &store.ttl())
            .finish_non_exhaustive()
    }
}
