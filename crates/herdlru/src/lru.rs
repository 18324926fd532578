//! LRU-K cache with a byte budget
//!
//! Keys must be seen `k` times before they are admitted. Until then they
//! live in a bounded history tier that only counts visits; values offered
//! while a key is still in history are dropped. With `k == 1` the history
//! tier is bypassed and the cache behaves as plain LRU.

use std::collections::HashMap;
use std::fmt;

use ahash::RandomState;

use crate::list::List;

/// Anything that can report how many bytes it occupies
pub trait Value {
    /// Size in bytes charged against the cache budget
    fn len(&self) -> usize;

    /// True when the value occupies no bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for String {
    fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

impl Value for Box<[u8]> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }
}

impl Value for &str {
    fn len(&self) -> usize {
        str::len(self)
    }
}

/// Callback run with the key and value of every evicted entry
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

/// Admitted entry in the cache tier
struct Entry<V> {
    key: String,
    value: V,
}

/// Key that has been requested but not yet promoted
struct Record {
    key: String,
    visits: usize,
}

/// LRU-K cache bounded by the total size of keys plus values
pub struct LruKCache<V> {
    k: usize,
    max_bytes: usize,
    bytes: usize,
    entries: List<Entry<V>>,
    index: HashMap<String, usize, RandomState>,
    history: List<Record>,
    history_index: HashMap<String, usize, RandomState>,
    history_max: usize,
    evictions: u64,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruKCache<V> {
    /// Create a new LRU-K cache
    ///
    /// # Arguments
    /// * `k` - Visits required before a key is admitted (1 = plain LRU)
    /// * `max_bytes` - Budget for keys plus values, 0 for unbounded
    /// * `history_max` - Number of not-yet-admitted keys to track
    pub fn new(k: usize, max_bytes: usize, history_max: usize) -> Self {
        assert!(k > 0, "K must be greater than 0");

        Self {
            k,
            max_bytes,
            bytes: 0,
            entries: List::new(),
            index: HashMap::with_hasher(RandomState::new()),
            history: List::new(),
            history_index: HashMap::with_hasher(RandomState::new()),
            history_max,
            evictions: 0,
            on_evicted: None,
        }
    }

    /// Create a new LRU-K cache that reports evicted entries to `on_evicted`
    pub fn with_on_evicted(
        k: usize,
        max_bytes: usize,
        history_max: usize,
        on_evicted: OnEvicted<V>,
    ) -> Self {
        let mut cache = Self::new(k, max_bytes, history_max);
        cache.on_evicted = Some(on_evicted);
        cache
    }

    /// Look up an admitted key and mark it most recently used
    ///
    /// The history tier is never consulted: a key only reads back once it
    /// has been promoted.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.entries.move_to_front(idx);
        self.entries.get(idx).map(|entry| &entry.value)
    }

    /// Record a visit of `key` carrying `value`
    ///
    /// Admitted keys are overwritten in place. Other keys count a visit in
    /// the history tier and are promoted with this call's value when the
    /// count reaches `k`. The cache is then shrunk back under its budget.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&idx) = self.index.get(key) {
            self.update(idx, value);
        } else if self.k == 1 {
            self.insert(key.to_owned(), value);
        } else {
            self.visit(key, value);
        }

        self.shrink();
    }

    /// Evict the least recently used admitted entry
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let entry = self.entries.pop_back()?;
        self.index.remove(&entry.key);
        self.bytes -= entry.key.len() + entry.value.len();
        self.evictions += 1;

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&entry.key, &entry.value);
        }

        Some((entry.key, entry.value))
    }

    /// Check whether `key` is admitted without touching recency
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Admitted keys, most recently used first
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Visits counted so far for a key still in history
    pub fn visits(&self, key: &str) -> Option<usize> {
        let idx = *self.history_index.get(key)?;
        self.history.get(idx).map(|record| record.visits)
    }

    /// Bytes currently charged to admitted entries
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Byte budget, 0 when unbounded
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Number of admitted entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry has been admitted
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Visits required for admission
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of keys tracked in history
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Capacity of the history tier
    pub fn history_max(&self) -> usize {
        self.history_max
    }

    /// Total entries evicted since creation
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn update(&mut self, idx: usize, value: V) {
        if let Some(entry) = self.entries.get_mut(idx) {
            self.bytes = self.bytes + value.len() - entry.value.len();
            entry.value = value;
        }
        self.entries.move_to_front(idx);
    }

    fn insert(&mut self, key: String, value: V) {
        self.bytes += key.len() + value.len();
        let idx = self.entries.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, idx);
    }

    fn visit(&mut self, key: &str, value: V) {
        let Some(idx) = self.history_index.get(key).copied() else {
            self.track(key);
            return;
        };

        let visits = match self.history.get_mut(idx) {
            Some(record) => {
                record.visits += 1;
                record.visits
            }
            None => return,
        };

        if visits >= self.k {
            self.history_index.remove(key);
            self.history.remove(idx);
            self.insert(key.to_owned(), value);
        } else {
            self.history.move_to_front(idx);
        }
    }

    fn track(&mut self, key: &str) {
        if self.history_max == 0 {
            return;
        }

        if self.history.len() >= self.history_max {
            if let Some(oldest) = self.history.pop_back() {
                self.history_index.remove(&oldest.key);
            }
        }

        let idx = self.history.push_front(Record {
            key: key.to_owned(),
            visits: 1,
        });
        self.history_index.insert(key.to_owned(), idx);
    }

    fn shrink(&mut self) {
        while self.max_bytes != 0 && self.bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }
}

impl<V> fmt::Debug for LruKCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCache")
            .field("k", &self.k)
            .field("max_bytes", &self.max_bytes)
            .field("bytes", &self.bytes)
            .field("len", &self.entries.len())
            .field("history_len", &self.history.len())
            .field("history_max", &self.history_max)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn charged(cache: &LruKCache<String>) -> usize {
        cache
            .entries
            .iter()
            .map(|entry| entry.key.len() + entry.value.len())
            .sum()
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruKCache::new(1, 0, 30);

        cache.add("key1", "1234".to_string());

        assert_eq!(cache.get("key1"), Some(&"1234".to_string()));
        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.bytes(), 8);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruKCache::new(1, 20, 30);

        cache.add("key1", "1234".to_string());
        cache.add("key2", "1234".to_string());
        cache.add("key3", "1234".to_string()); // Should evict key1

        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key2"), Some(&"1234".to_string()));
        assert_eq!(cache.get("key3"), Some(&"1234".to_string()));
        assert_eq!(cache.bytes(), 16);
    }

    #[test]
    fn test_lru_update() {
        let mut cache = LruKCache::new(1, 20, 30);

        cache.add("k1", "aaaaaa".to_string());
        cache.add("k2", "bbbbbb".to_string());
        cache.get("k1"); // Move k1 to front
        cache.add("k3", "cccccc".to_string()); // Should evict k2

        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["k3", "k1"]);
    }

    #[test]
    fn test_lru_overwrite_adjusts_bytes() {
        let mut cache = LruKCache::new(1, 0, 30);

        cache.add("key", "a".to_string());
        cache.add("key", "abcdef".to_string());

        assert_eq!(cache.get("key"), Some(&"abcdef".to_string()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.bytes(), 9);

        cache.add("key", "ab".to_string());
        assert_eq!(cache.bytes(), 5);
    }

    #[test]
    fn test_remove_oldest() {
        let (k1, k2, k3) = ("key1", "key2", "key3");
        let (v1, v2, v3) = ("value1", "value2", "value3");
        let cap = k1.len() + k2.len() + v1.len() + v2.len();
        let mut cache = LruKCache::new(1, cap, 30);

        cache.add(k1, v1.to_string());
        cache.add(k2, v2.to_string());
        cache.add(k3, v3.to_string());

        assert_eq!(cache.get(k1), None);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.remove_oldest(), Some((k2.to_string(), v2.to_string())));
        assert_eq!(cache.bytes(), k3.len() + v3.len());
    }

    #[test]
    fn test_on_evicted_order() {
        let (tx, rx) = mpsc::channel();
        let mut cache = LruKCache::with_on_evicted(
            1,
            10,
            30,
            Box::new(move |key: &str, _: &String| {
                let _ = tx.send(key.to_string());
            }),
        );

        cache.add("key1", "123456".to_string());
        cache.add("k2", "k2".to_string());
        cache.add("k3", "k3".to_string());
        cache.add("k4", "k4".to_string());

        let evicted: Vec<String> = rx.try_iter().collect();
        assert_eq!(evicted, vec!["key1", "k2"]);
        assert!(cache.contains("k3"));
        assert!(cache.contains("k4"));
        assert_eq!(cache.evictions(), 2);
    }

    #[test]
    fn test_lru_k_requires_k_adds() {
        let mut cache = LruKCache::new(3, 0, 30);

        cache.add("key", "v".to_string());
        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.visits("key"), Some(1));

        cache.add("key", "v".to_string());
        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.visits("key"), Some(2));

        cache.add("key", "v".to_string());
        assert_eq!(cache.get("key"), Some(&"v".to_string()));
        assert_eq!(cache.visits("key"), None);
        assert_eq!(cache.history_len(), 0);
    }

    #[test]
    fn test_lru_k_unlimited() {
        let mut cache = LruKCache::new(2, 0, 30);

        cache.add("key1", "1234".to_string());
        cache.add("key1", "1234".to_string());
        cache.add("key3", "1234".to_string());

        assert_eq!(cache.get("key3"), None);
        assert_eq!(cache.get("key1"), Some(&"1234".to_string()));
    }

    #[test]
    fn test_lru_k_limited() {
        let mut cache = LruKCache::new(2, 20, 30);

        for key in ["key1", "key2", "key3"] {
            cache.add(key, "1234".to_string());
            cache.add(key, "1234".to_string());
        }

        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key2"), Some(&"1234".to_string()));
        assert_eq!(cache.get("key3"), Some(&"1234".to_string()));
    }

    #[test]
    fn test_lru_k_promotes_value_of_promoting_add() {
        let mut cache = LruKCache::new(2, 0, 30);

        cache.add("key", "first".to_string());
        cache.add("key", "second".to_string());

        assert_eq!(cache.get("key"), Some(&"second".to_string()));
        assert_eq!(cache.bytes(), "key".len() + "second".len());
    }

    #[test]
    fn test_lru_k_admitted_key_updates_in_place() {
        let mut cache = LruKCache::new(2, 0, 30);

        cache.add("key", "a".to_string());
        cache.add("key", "a".to_string());
        cache.add("key", "abc".to_string());

        assert_eq!(cache.get("key"), Some(&"abc".to_string()));
        assert_eq!(cache.history_len(), 0);
        assert_eq!(cache.bytes(), 6);
    }

    #[test]
    fn test_history_eviction() {
        let mut cache = LruKCache::new(2, 0, 2);

        cache.add("key1", "1234".to_string());
        cache.add("key2", "1234".to_string());
        cache.add("key3", "1234".to_string()); // Drops key1 from history
        assert_eq!(cache.visits("key1"), None);
        assert_eq!(cache.history_len(), 2);

        cache.add("key1", "1234".to_string()); // Restarts at 1, drops key2
        assert_eq!(cache.visits("key1"), Some(1));
        assert_eq!(cache.visits("key2"), None);

        cache.add("key3", "1234".to_string());

        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.get("key3"), Some(&"1234".to_string()));
    }

    #[test]
    fn test_history_visit_refreshes_record() {
        let mut cache = LruKCache::new(3, 0, 2);

        cache.add("a", "1".to_string());
        cache.add("b", "1".to_string());
        cache.add("a", "1".to_string()); // a is now the freshest record
        cache.add("c", "1".to_string()); // Drops b, not a

        assert_eq!(cache.visits("a"), Some(2));
        assert_eq!(cache.visits("b"), None);
        assert_eq!(cache.visits("c"), Some(1));
    }

    #[test]
    fn test_zero_history_never_admits() {
        let mut cache = LruKCache::new(2, 0, 0);

        cache.add("key", "v".to_string());
        cache.add("key", "v".to_string());

        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.history_len(), 0);
    }

    #[test]
    fn test_oversized_value_is_evicted() {
        let mut cache = LruKCache::new(1, 8, 30);

        cache.add("a", "1".to_string());
        cache.add("big", "0123456789".to_string());

        assert!(cache.is_empty());
        assert_eq!(cache.bytes(), 0);
        assert_eq!(cache.evictions(), 2);
    }

    #[test]
    fn test_key_in_one_tier_only() {
        let mut cache = LruKCache::new(2, 0, 30);

        cache.add("key", "v".to_string());
        assert!(!cache.contains("key"));
        assert_eq!(cache.visits("key"), Some(1));

        cache.add("key", "v".to_string());
        assert!(cache.contains("key"));
        assert_eq!(cache.visits("key"), None);
    }

    #[test]
    fn test_byte_accounting_under_mixed_ops() {
        for k in 1..=3 {
            let mut cache = LruKCache::new(k, 64, 8);
            let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

            for _ in 0..2_000 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let key = format!("k{}", (seed >> 33) % 16);
                let len = ((seed >> 20) % 12) as usize;

                if (seed >> 40) % 3 == 0 {
                    cache.get(&key);
                } else {
                    cache.add(&key, "x".repeat(len));
                }

                assert!(cache.bytes() <= 64);
                assert_eq!(cache.bytes(), charged(&cache));
                assert_eq!(cache.len(), cache.index.len());
                assert!(cache.history_len() <= 8);
                for key in cache.index.keys() {
                    assert!(!cache.history_index.contains_key(key));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "K must be greater than 0")]
    fn test_zero_k_panics() {
        let _ = LruKCache::<String>::new(0, 0, 30);
    }
}
