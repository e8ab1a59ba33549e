//! Cache Module
//!
//! Fixed-capacity cache with TTL expiration and freshness-driven eviction,
//! built on a position-aware expiration heap and a key index.

mod clock;
mod entry;
mod heap;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::{CacheEntry, NOT_IN_HEAP};
pub use heap::{ExpirationIndex, SlotId};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_cache::{EvictionCallback, TtlCache};
