//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found their key
    pub hits: u64,
    /// Number of lookups that did not
    pub misses: u64,
    /// Number of entries evicted to make room for a new key
    pub evictions: u64,
    /// Evictions whose victim had already outlived its TTL
    pub expired_evictions: u64,
    /// Number of entries removed explicitly by key
    pub removals: u64,
    /// Number of expired entries dropped by an explicit purge
    pub purged: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Callback Invocations ==
    /// Total entries handed to the eviction callback.
    pub fn callback_invocations(&self) -> u64 {
        self.evictions + self.removals + self.purged
    }

    // == Record Lookup ==
    /// Counts a lookup that found its key.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a lookup that found nothing.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Counts a capacity eviction, noting whether the victim had expired.
    pub fn record_eviction(&mut self, expired: bool) {
        self.evictions += 1;
        if expired {
            self.expired_evictions += 1;
        }
    }

    // == Record Removal ==
    /// Counts an explicit removal of a present key.
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Counts `count` entries dropped by an explicit purge.
    pub fn record_purged(&mut self, count: usize) {
        self.purged += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
