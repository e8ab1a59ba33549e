//! Configuration Module
//!
//! Handles loading cache and workload configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache and workload configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time-to-live in milliseconds applied on every insert and refresh
    pub ttl_ms: u64,
    /// Number of concurrent workload tasks
    pub workers: usize,
    /// Operations performed by each workload task
    pub operations: usize,
    /// Number of distinct keys the workload touches
    pub key_space: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `WORKLOAD_WORKERS` - Concurrent workload tasks (default: 4)
    /// - `WORKLOAD_OPERATIONS` - Operations per task (default: 100000)
    /// - `WORKLOAD_KEY_SPACE` - Distinct keys in the workload (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            workers: env_or("WORKLOAD_WORKERS", defaults.workers),
            operations: env_or("WORKLOAD_OPERATIONS", defaults.operations),
            key_space: env_or("WORKLOAD_KEY_SPACE", defaults.key_space),
        }
    }

    /// Entry TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Rejects values the cache or the workload cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        if self.workers == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_WORKERS must be greater than zero".to_string(),
            ));
        }
        if self.key_space == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_KEY_SPACE must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 300_000,
            workers: 4,
            operations: 100_000,
            key_space: 2000,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
