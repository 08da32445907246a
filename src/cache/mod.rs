//! Cache Module
//!
//! Provides bounded in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
