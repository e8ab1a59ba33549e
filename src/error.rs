//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its workload driver.
///
/// Lookups never fail: a missing key is reported through `Option`, not here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity of zero was requested
    #[error("Invalid capacity: cache capacity must be greater than zero")]
    ZeroCapacity,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal failure (e.g. a workload worker panicked)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::ZeroCapacity.to_string(),
            "Invalid capacity: cache capacity must be greater than zero"
        );
        assert_eq!(
            CacheError::InvalidConfig("workers must be > 0".to_string()).to_string(),
            "Invalid configuration: workers must be > 0"
        );
        assert_eq!(
            CacheError::Internal("boom".to_string()).to_string(),
            "Internal error: boom"
        );
    }
}
