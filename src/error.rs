//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only construction can fail: missing and expired keys are reported as
//! `None` by the store, never as errors.

use thiserror::Error;

// == Config Error Enum ==
/// Errors raised when a cache is constructed with invalid options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity must allow at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Default TTL must be a positive duration
    #[error("Invalid default TTL: {0} ms (must be positive)")]
    InvalidDefaultTtl(u64),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
