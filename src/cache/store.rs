//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with recency tracking and TTL
//! expiration. Eviction and recency updates are O(1) through the linked
//! recency list; expired entries are removed lazily on read and in bulk by
//! `sweep_expired`.

use std::collections::HashMap;

use rand::seq::IteratorRandom;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, RecencyList};
use crate::config::CacheConfig;
use crate::error::{ConfigError, Result};

// == Cache Store ==
/// Bounded key-value store with LRU eviction and TTL expiration.
///
/// The store is synchronous and single-owner: no method blocks or performs
/// I/O. Hosts that share a store across tasks wrap it in
/// `Arc<tokio::sync::RwLock<_>>` and take the write lock for every call that
/// touches recency, which includes `get`.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency order for LRU eviction
    recency: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl_ms: u64,
    /// Entries inspected per sweep; 0 means full sweep
    sweep_sample_size: usize,
    /// Timestamp of the last sweep (Unix milliseconds)
    last_cleanup_at: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore from the given configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if `capacity` or `default_ttl_ms` is zero.
    pub fn new(config: CacheConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(config.capacity));
        }
        if config.default_ttl_ms == 0 {
            return Err(ConfigError::InvalidDefaultTtl(config.default_ttl_ms));
        }

        Ok(Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            capacity: config.capacity,
            default_ttl_ms: config.default_ttl_ms,
            sweep_sample_size: config.sweep_sample_size,
            last_cleanup_at: current_timestamp_ms(),
        })
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in milliseconds.
    ///
    /// If the key already exists, the value is overwritten, the TTL is reset
    /// and the entry becomes most recently used. A missing or zero TTL falls
    /// back silently to the default.
    ///
    /// When inserting a new key at capacity, expired entries are reclaimed
    /// first; only if the cache is still full is the least recently used
    /// entry evicted.
    pub fn set(&mut self, key: String, value: V, ttl_ms: Option<u64>) {
        let effective_ttl = match ttl_ms {
            Some(ttl) if ttl > 0 => ttl,
            _ => self.default_ttl_ms,
        };

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.capacity {
            // Dead entries should not cost a live one its slot
            self.sweep_full();
            if self.entries.len() >= self.capacity {
                self.evict_lru();
            }
        }

        let entry = CacheEntry::new(value, effective_ttl);
        self.entries.insert(key.clone(), entry);
        self.recency.touch(&key);

        self.stats.record_insertion();
        self.stats.set_total_entries(self.entries.len());
        self.debug_check_sync();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` if the key is missing or its entry has expired; the
    /// two cases are indistinguishable by design. A hit updates the entry's
    /// last-access time and makes it most recently used. An entry found
    /// expired is removed on the spot so later reads do not re-check it.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();

        let live_value = match self.entries.get_mut(key) {
            Some(entry) => {
                if entry.is_expired_at(now) {
                    None
                } else {
                    entry.touch();
                    Some(entry.value.clone())
                }
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        match live_value {
            Some(value) => {
                self.recency.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                // Lazy expiry: the entry was present but dead
                self.entries.remove(key);
                self.recency.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                self.debug_check_sync();
                debug!(key, "removed expired entry on read");
                None
            }
        }
    }

    // == Has ==
    /// Checks whether a live (non-expired) entry exists for `key`.
    ///
    /// Unlike `get`, this neither bumps recency nor records a hit or miss,
    /// so existence probes do not count as "use".
    pub fn has(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether an entry was present. Deleting an absent key is a
    /// no-op, not an error.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.recency.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.debug_check_sync();
            true
        } else {
            false
        }
    }

    // == Sweep Expired ==
    /// Removes expired entries and returns how many were removed.
    ///
    /// With `sweep_sample_size == 0` the whole cache is scanned. Otherwise a
    /// random sample of at most that many entries is inspected, bounding the
    /// work per sweep; entries the sample misses are still caught lazily on
    /// access or by a later sweep.
    pub fn sweep_expired(&mut self) -> usize {
        let removed = if self.sweep_sample_size == 0 {
            self.sweep_full()
        } else {
            self.sweep_sample()
        };

        self.last_cleanup_at = current_timestamp_ms();
        removed
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.set_total_entries(0);
    }

    /// Removes entries whose key contains `pattern` as a substring.
    ///
    /// Returns the number of entries removed.
    pub fn clear_matching(&mut self, pattern: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect();

        let count = matching.len();
        for key in matching {
            self.entries.remove(&key);
            self.recency.remove(&key);
        }

        self.stats.set_total_entries(self.entries.len());
        self.debug_check_sync();
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    ///
    /// Physically stored expired entries count until they are reclaimed;
    /// they are still never returned by `get` or `has`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the timestamp of the last sweep (Unix milliseconds).
    pub fn last_cleanup_at(&self) -> u64 {
        self.last_cleanup_at
    }

    // == Internal: eviction and sweeps ==
    /// Evicts the single least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(evicted) = self.recency.pop_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently used entry");
        }
        self.debug_check_sync();
    }

    /// Scans the whole cache and removes every expired entry.
    fn sweep_full(&mut self) -> usize {
        let now = current_timestamp_ms();

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        self.remove_expired_batch(expired_keys)
    }

    /// Inspects a random sample of entries and removes the expired ones.
    fn sweep_sample(&mut self) -> usize {
        let now = current_timestamp_ms();
        let mut rng = rand::thread_rng();

        let sample: Vec<String> = self
            .entries
            .keys()
            .cloned()
            .choose_multiple(&mut rng, self.sweep_sample_size);

        let expired_keys: Vec<String> = sample
            .into_iter()
            .filter(|key| {
                self.entries
                    .get(key)
                    .map(|entry| entry.is_expired_at(now))
                    .unwrap_or(false)
            })
            .collect();

        self.remove_expired_batch(expired_keys)
    }

    /// Removes a batch of expired keys, keeping stats and recency in sync.
    fn remove_expired_batch(&mut self, expired_keys: Vec<String>) -> usize {
        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.recency.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        self.debug_check_sync();
        count
    }

    /// Entries and recency order must stay in bijection; a mismatch is a
    /// defect in this module, not a recoverable condition.
    fn debug_check_sync(&self) {
        debug_assert_eq!(
            self.entries.len(),
            self.recency.len(),
            "entries and recency order out of sync"
        );
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn test_config(capacity: usize) -> CacheConfig {
        CacheConfig {
            capacity,
            default_ttl_ms: 300_000,
            cleanup_interval_ms: 60_000,
            sweep_sample_size: 0,
        }
    }

    fn test_store(capacity: usize) -> CacheStore<String> {
        CacheStore::new(test_config(capacity)).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = test_store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result = CacheStore::<String>::new(test_config(0));
        assert_eq!(result.unwrap_err(), ConfigError::InvalidCapacity(0));
    }

    #[test]
    fn test_store_rejects_zero_default_ttl() {
        let mut config = test_config(100);
        config.default_ttl_ms = 0;
        let result = CacheStore::<String>::new(config);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidDefaultTtl(0));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), None);
        let value = store.get("key1");

        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = test_store(100);

        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_zero_ttl_falls_back_to_default() {
        let mut store = test_store(100);

        // Zero is not a usable TTL; the default applies silently
        store.set("key1".to_string(), "value1".to_string(), Some(0));

        assert_eq!(store.get("key1"), Some("value1".to_string()));
    }

    #[test]
    fn test_store_delete() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), None);
        assert!(store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let mut store = test_store(100);
        store.set("key1".to_string(), "value1".to_string(), None);

        assert!(!store.delete("nonexistent"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key1".to_string(), "value2".to_string(), None);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), Some(50));

        // Should be accessible immediately
        assert_eq!(store.get("key1"), Some("value1".to_string()));

        sleep(Duration::from_millis(80));

        // Expired now; the dead entry is also physically removed
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), Some(100));
        sleep(Duration::from_millis(60));

        // Re-set before expiry; the clock restarts from here
        store.set("key1".to_string(), "value2".to_string(), Some(100));
        sleep(Duration::from_millis(60));

        // 120ms after the first set, 60ms after the second
        assert_eq!(store.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = test_store(3);

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.set("key3".to_string(), "value3".to_string(), None);

        // Cache is full, adding key4 should evict key1 (oldest)
        store.set("key4".to_string(), "value4".to_string(), None);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = test_store(3);

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.set("key3".to_string(), "value3".to_string(), None);

        // Access key1 to make it most recently used
        store.get("key1").unwrap();

        // Adding key4 should evict key2 (now oldest)
        store.set("key4".to_string(), "value4".to_string(), None);

        assert!(store.get("key1").is_some());
        assert_eq!(store.get("key2"), None);
    }

    #[test]
    fn test_store_has_does_not_bump_recency() {
        let mut store = test_store(2);

        store.set("a".to_string(), "1".to_string(), None);
        store.set("b".to_string(), "2".to_string(), None);

        // An existence probe is not a use: a stays oldest
        assert!(store.has("a"));

        store.set("c".to_string(), "3".to_string(), None);

        assert_eq!(store.get("a"), None);
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_store_has_expired_entry() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), Some(30));
        assert!(store.has("key1"));

        sleep(Duration::from_millis(60));

        assert!(!store.has("key1"));
    }

    #[test]
    fn test_store_eviction_tie_break_is_insertion_order() {
        let mut store = test_store(2);

        // Neither entry is ever read, so both share their insertion
        // timestamps as last access; the earliest insertion goes first
        store.set("first".to_string(), "1".to_string(), None);
        store.set("second".to_string(), "2".to_string(), None);
        store.set("third".to_string(), "3".to_string(), None);

        assert_eq!(store.get("first"), None);
        assert!(store.get("second").is_some());
        assert!(store.get("third").is_some());
    }

    #[test]
    fn test_store_set_reclaims_expired_before_evicting() {
        let mut store = test_store(2);

        store.set("dying".to_string(), "1".to_string(), Some(30));
        store.set("living".to_string(), "2".to_string(), None);

        sleep(Duration::from_millis(60));

        // "dying" has expired; inserting a third key must reclaim it
        // rather than evict "living"
        store.set("new".to_string(), "3".to_string(), None);

        assert!(store.get("living").is_some());
        assert!(store.get("new").is_some());
        assert_eq!(store.get("dying"), None);
    }

    #[test]
    fn test_store_stats() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), None);
        store.get("key1").unwrap(); // hit
        let _ = store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_sweep_expired_full() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), Some(30));
        store.set("key2".to_string(), "value2".to_string(), Some(10_000));

        sleep(Duration::from_millis(60));

        // key1 expires with no intervening read
        let removed = store.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_some());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_sweep_expired_sampled() {
        let mut config = test_config(100);
        config.sweep_sample_size = 200; // sample covers the whole cache
        let mut store: CacheStore<String> = CacheStore::new(config).unwrap();

        for i in 0..20 {
            store.set(format!("key{}", i), "value".to_string(), Some(30));
        }

        sleep(Duration::from_millis(60));

        // With the sample covering every entry, one sweep removes all
        let removed = store.sweep_expired();
        assert_eq!(removed, 20);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_sweep_updates_last_cleanup() {
        let mut store = test_store(100);
        let before = store.last_cleanup_at();

        sleep(Duration::from_millis(10));
        store.sweep_expired();

        assert!(store.last_cleanup_at() > before);
    }

    #[test]
    fn test_store_clear() {
        let mut store = test_store(100);

        store.set("key1".to_string(), "value1".to_string(), None);
        store.set("key2".to_string(), "value2".to_string(), None);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_clear_matching() {
        let mut store = test_store(100);

        store.set("device:1".to_string(), "a".to_string(), None);
        store.set("device:2".to_string(), "b".to_string(), None);
        store.set("room:1".to_string(), "c".to_string(), None);

        let removed = store.clear_matching("device:");

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("device:1"), None);
        assert!(store.get("room:1").is_some());
    }

    #[test]
    fn test_store_non_string_values() {
        let config = test_config(10);
        let mut store: CacheStore<Vec<u64>> = CacheStore::new(config).unwrap();

        store.set("readings".to_string(), vec![21, 22, 23], None);

        assert_eq!(store.get("readings"), Some(vec![21, 22, 23]));
    }
}
