//! Keyed Cache Module
//!
//! Bounded cache combining HashMap storage with write-order tracking.
//! Keys are derived from request attributes.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{derive_key, CacheStats, RecencyOrder, Request};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Keyed Cache ==
/// Bounded cache mapping request attributes to values.
///
/// Capacity bounds the number of distinct keys. Writes insert or promote a
/// key to the newest position; reads never change the order. When a new key
/// arrives at capacity the oldest written key is evicted.
#[derive(Debug, Clone)]
pub struct KeyedCache<V> {
    /// Key-value storage
    entries: HashMap<String, V>,
    /// Write order, oldest first
    order: RecencyOrder,
    /// Lookup statistics
    stats: CacheStats,
    /// Maximum number of distinct keys
    capacity: usize,
    /// Attributes used for key derivation; `None` uses all attributes
    key_attributes: Option<Vec<String>>,
}

impl<V> KeyedCache<V> {
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` distinct keys.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of distinct keys, must be at least 1
    /// * `key_attributes` - Attribute names (in order) used to build keys
    pub fn new(capacity: usize, key_attributes: Option<Vec<String>>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            entries: HashMap::new(),
            order: RecencyOrder::new(),
            stats: CacheStats::new(),
            capacity,
            key_attributes,
        })
    }

    /// Creates a cache with every attribute participating in the key.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(capacity, None)
    }

    /// Creates a cache sized and keyed by `config`.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.capacity, config.key_attributes.clone())
    }

    // == Key ==
    /// Returns the key this cache derives for `request`.
    pub fn key_for(&self, request: &Request) -> String {
        derive_key(request, self.key_attributes.as_deref())
    }

    // == Get ==
    /// Returns the value stored for `request`, if any.
    ///
    /// Pure read: neither the order nor the statistics change.
    pub fn get(&self, request: &Request) -> Option<&V> {
        self.entries.get(&self.key_for(request))
    }

    // == Lookup ==
    /// Like [`get`](Self::get) but records a hit or miss.
    pub fn lookup(&mut self, request: &Request) -> Option<&V> {
        let key = self.key_for(request);
        match self.entries.get(&key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `value` for `request`.
    ///
    /// Overwrites any existing value under the same key and moves that key to
    /// the newest position. A new key at capacity evicts the oldest key.
    pub fn put(&mut self, request: &Request, value: V) {
        let key = self.key_for(request);
        self.trim_for(&key);
        self.entries.insert(key.clone(), value);
        self.order.push_newest(&key);
        self.stats.set_total_entries(self.entries.len());
        debug!(key = %key, entries = self.entries.len(), "cache put");
    }

    // == Resize ==
    /// Changes the capacity, evicting oldest keys if the cache is now over it.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        self.capacity = capacity;
        while self.order.len() > self.capacity {
            self.evict_oldest();
        }
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    /// Makes room for `incoming` so the distinct-key count stays bounded.
    ///
    /// Stops as soon as the order is exactly at capacity and already holds
    /// `incoming`, since the upcoming write replaces rather than adds.
    fn trim_for(&mut self, incoming: &str) {
        while !self.order.is_empty() && self.order.len() >= self.capacity {
            if self.order.len() == self.capacity && self.order.contains(incoming) {
                break;
            }
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.order.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "cache eviction");
        }
    }

    // == Keys ==
    /// Keys in write order, oldest first.
    pub fn keys(&self) -> Vec<&str> {
        self.order.iter().collect()
    }

    // == Contains ==
    /// Checks if a value is stored under the key derived from `request`.
    pub fn contains(&self, request: &Request) -> bool {
        self.entries.contains_key(&self.key_for(request))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of distinct keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Key Attributes ==
    /// Returns the configured key attributes, or None when all are used.
    pub fn key_attributes(&self) -> Option<&[String]> {
        self.key_attributes.as_deref()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn p1() -> Request {
        Request::new().with("any", "params")
    }

    fn p2() -> Request {
        Request::new().with("any", "other value")
    }

    fn p3() -> Request {
        Request::new()
            .with("more", "keys")
            .with("to", "map")
            .with("any", "params")
    }

    fn p4() -> Request {
        Request::new()
            .with("to", "map")
            .with("any", "params")
            .with("more", "keys")
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = KeyedCache::<String>::with_capacity(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_size_one_overwrites_value() {
        let mut cache = KeyedCache::with_capacity(1).unwrap();

        cache.put(&p1(), "v1");
        assert_eq!(cache.keys(), vec!["[params]"]);
        assert_eq!(cache.get(&p1()), Some(&"v1"));

        cache.put(&p1(), "v2");
        assert_eq!(cache.keys(), vec!["[params]"]);
        assert_eq!(cache.get(&p1()), Some(&"v2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let mut cache = KeyedCache::with_capacity(1).unwrap();

        cache.put(&p3(), "v1");
        assert_eq!(cache.keys(), vec!["[params][keys][map]"]);
        assert_eq!(cache.get(&p4()), Some(&"v1"));

        cache.put(&p4(), "v2");
        assert_eq!(cache.keys(), vec!["[params][keys][map]"]);
        assert_eq!(cache.get(&p3()), Some(&"v2"));
    }

    #[test]
    fn test_rewritten_keys_are_not_dropped_prematurely() {
        let mut cache = KeyedCache::with_capacity(2).unwrap();

        cache.put(&p1(), "v1");
        assert_eq!(cache.keys(), vec!["[params]"]);

        cache.put(&p3(), "v2");
        assert_eq!(cache.keys(), vec!["[params]", "[params][keys][map]"]);
        assert_eq!(cache.get(&p1()), Some(&"v1"));
        assert_eq!(cache.get(&p3()), Some(&"v2"));

        // Rewriting p1 at capacity promotes it without evicting p3
        cache.put(&p1(), "v3");
        assert_eq!(cache.keys(), vec!["[params][keys][map]", "[params]"]);
        assert_eq!(cache.get(&p1()), Some(&"v3"));
        assert_eq!(cache.get(&p3()), Some(&"v2"));

        // A new key evicts p3, now the oldest write
        cache.put(&p2(), "v4");
        assert_eq!(cache.keys(), vec!["[params]", "[other value]"]);
        assert_eq!(cache.get(&p1()), Some(&"v3"));
        assert_eq!(cache.get(&p2()), Some(&"v4"));
        assert_eq!(cache.get(&p3()), None);

        cache.put(&p2(), "v5");
        assert_eq!(cache.keys(), vec!["[params]", "[other value]"]);
        assert_eq!(cache.get(&p1()), Some(&"v3"));
        assert_eq!(cache.get(&p2()), Some(&"v5"));
        assert_eq!(cache.get(&p3()), None);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_key_attribute_subset() {
        let names = vec!["any".to_string(), "map".to_string()];
        let mut cache = KeyedCache::new(10, Some(names)).unwrap();

        let k1 = Request::new().with("any", "a1").with("map", "m1");
        let k2 = Request::new().with("any", "a1");
        let k3 = Request::new()
            .with("any", "a1")
            .with("map", "m1")
            .with("other", "o1");
        let k4 = Request::new().with("map", "m1").with("other", "o1");

        cache.put(&k1, "v1");
        assert_eq!(cache.keys(), vec!["[a1][m1]"]);

        cache.put(&k2, "v2");
        assert_eq!(cache.keys(), vec!["[a1][m1]", "[a1][]"]);
        assert_eq!(cache.get(&k3), Some(&"v1"));

        cache.put(&k3, "v3");
        assert_eq!(cache.keys(), vec!["[a1][]", "[a1][m1]"]);
        assert_eq!(cache.get(&k1), Some(&"v3"));
        assert_eq!(cache.get(&k2), Some(&"v2"));

        cache.put(&k4, "v4");
        assert_eq!(cache.keys(), vec!["[a1][]", "[a1][m1]", "[][m1]"]);
        assert_eq!(cache.get(&k4), Some(&"v4"));
    }

    #[test]
    fn test_get_does_not_promote() {
        let mut cache = KeyedCache::with_capacity(2).unwrap();

        cache.put(&p1(), "v1");
        cache.put(&p2(), "v2");
        assert_eq!(cache.get(&p1()), Some(&"v1"));
        assert_eq!(cache.lookup(&p1()), Some(&"v1"));

        // p1 is still the oldest write despite the reads
        cache.put(&p3(), "v3");
        assert_eq!(cache.get(&p1()), None);
        assert_eq!(cache.get(&p2()), Some(&"v2"));
        assert_eq!(cache.get(&p3()), Some(&"v3"));
    }

    #[test]
    fn test_lookup_records_stats() {
        let mut cache = KeyedCache::with_capacity(4).unwrap();

        cache.put(&p1(), 1);
        assert!(cache.lookup(&p1()).is_some());
        assert!(cache.lookup(&p2()).is_none());
        assert!(cache.get(&p2()).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_resize_down_evicts_oldest() {
        let mut cache = KeyedCache::with_capacity(3).unwrap();

        cache.put(&p1(), 1);
        cache.put(&p2(), 2);
        cache.put(&p3(), 3);
        cache.resize(1).unwrap();

        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.keys(), vec!["[params][keys][map]"]);
        assert_eq!(cache.stats().evictions, 2);
        assert!(matches!(
            cache.resize(0),
            Err(CacheError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = CacheConfig::new(3).with_key_attributes(["cid"]);
        let cache = KeyedCache::<u32>::from_config(&config).unwrap();

        let request = Request::new().with("cid", "c7").with("page", 2);
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.key_for(&request), "[c7]");
        assert_eq!(cache.key_attributes(), Some(&["cid".to_string()][..]));
    }

    #[test]
    fn test_contains_and_empty() {
        let mut cache = KeyedCache::with_capacity(2).unwrap();
        assert!(cache.is_empty());

        cache.put(&p1(), ());
        assert!(cache.contains(&p1()));
        assert!(!cache.contains(&p2()));
        assert!(!cache.is_empty());
    }
}
