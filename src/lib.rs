//! ttl_lru - A fixed-capacity, thread-safe cache
//!
//! Entries carry a TTL refreshed on every write and hit. When the cache is
//! full, an expired entry is evicted first, otherwise the one refreshed
//! longest ago.

pub mod cache;
pub mod config;
pub mod error;
pub mod workload;

pub use cache::{CacheStats, Clock, ManualClock, MonotonicClock, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use workload::run_workload;
