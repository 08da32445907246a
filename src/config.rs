//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Validation happens when the store is constructed, not here: `from_env`
/// silently falls back to defaults so a misconfigured host still boots.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of live entries before LRU eviction triggers
    pub capacity: usize,
    /// Default TTL in milliseconds for entries set without an explicit TTL
    pub default_ttl_ms: u64,
    /// Interval in milliseconds between background sweeps
    pub cleanup_interval_ms: u64,
    /// Entries inspected per sweep; 0 means a full sweep
    pub sweep_sample_size: usize,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 60000)
    /// - `CACHE_SWEEP_SAMPLE_SIZE` - Entries inspected per sweep, 0 = full (default: 0)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl_ms: env::var("CACHE_DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            cleanup_interval_ms: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
            sweep_sample_size: env::var("CACHE_SWEEP_SAMPLE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl_ms: 300_000,
            cleanup_interval_ms: 60_000,
            sweep_sample_size: 0,
        }
    }
}
