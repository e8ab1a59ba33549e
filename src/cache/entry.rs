//! Cache Entry Module
//!
//! Defines the record shared by the key index and the expiration heap.

use std::time::Duration;

/// Heap position of an entry that has been detached from the heap.
pub const NOT_IN_HEAP: usize = usize::MAX;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
///
/// Times are offsets from the owning cache's clock origin.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key, unique within the cache
    pub key: K,
    /// The stored value
    pub value: V,
    /// Last refresh time plus TTL
    pub expire_at: Duration,
    /// Index of this entry in the heap array, `NOT_IN_HEAP` once detached
    pub heap_position: usize,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after `now`.
    pub fn new(key: K, value: V, now: Duration, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expire_at: now.saturating_add(ttl),
            heap_position: NOT_IN_HEAP,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once `now` reaches its expiration time, so a TTL
    /// of zero produces an entry that is expired from the start.
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expire_at
    }

    // == Refresh ==
    /// Pushes the expiration out to `now + ttl`.
    ///
    /// The caller must repair the heap position afterwards.
    pub fn refresh(&mut self, now: Duration, ttl: Duration) {
        self.expire_at = now.saturating_add(ttl);
    }

    // == Time To Live ==
    /// Returns remaining life, zero once expired.
    pub fn ttl_remaining(&self, now: Duration) -> Duration {
        self.expire_at.saturating_sub(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("key", 7, Duration::from_secs(1), TTL);

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, 7);
        assert_eq!(entry.expire_at, Duration::from_secs(11));
        assert_eq!(entry.heap_position, NOT_IN_HEAP);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("key", 7, Duration::ZERO, TTL);

        assert!(!entry.is_expired(Duration::from_secs(9)));
        assert!(entry.is_expired(Duration::from_secs(11)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("key", 7, Duration::ZERO, TTL);

        // Expired exactly when now == expire_at
        assert!(entry.is_expired(TTL), "Entry should be expired at boundary");
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let now = Duration::from_millis(50);
        let entry = CacheEntry::new("key", 7, now, Duration::ZERO);
        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_refresh_extends_life() {
        let mut entry = CacheEntry::new("key", 7, Duration::ZERO, TTL);

        entry.refresh(Duration::from_secs(20), TTL);

        assert_eq!(entry.expire_at, Duration::from_secs(30));
        assert!(!entry.is_expired(Duration::from_secs(25)));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("key", 7, Duration::ZERO, TTL);

        assert_eq!(entry.ttl_remaining(Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(entry.ttl_remaining(Duration::from_secs(40)), Duration::ZERO);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("key", 7, Duration::from_secs(1), Duration::MAX);
        assert_eq!(entry.expire_at, Duration::MAX);
        assert!(!entry.is_expired(Duration::from_secs(1_000_000)));
    }
}
