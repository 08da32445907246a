//! Bounded Cache - an in-memory cache with TTL expiration and LRU eviction
//!
//! Entries are held in a HashMap alongside a linked recency order, giving
//! O(1) reads, inserts, recency bumps and evictions. Expired entries are
//! dropped lazily on read and in bulk by full or sampled sweeps, which can
//! run from the bundled tokio background task or be driven explicitly by
//! the host.
//!
//! A cache is constructed explicitly from a [`CacheConfig`] and shared by
//! handle; there is no global instance.
//!
//! # Example
//! ```
//! use bounded_cache::{CacheConfig, CacheStore};
//!
//! let config = CacheConfig {
//!     capacity: 2,
//!     ..CacheConfig::default()
//! };
//! let mut cache: CacheStore<String> = CacheStore::new(config).unwrap();
//!
//! cache.set("a".to_string(), "1".to_string(), None);
//! cache.set("b".to_string(), "2".to_string(), None);
//! cache.get("a");
//! cache.set("c".to_string(), "3".to_string(), None);
//!
//! // "b" was least recently used and has been evicted
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some("1".to_string()));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::ConfigError;
pub use tasks::spawn_sweep_task;
