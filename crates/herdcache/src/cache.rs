//! Cache: LRU-K engine behind a mutex

use herdlru::LruKCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::byteview::ByteView;
use crate::config::GroupConfig;

/// Thread-safe wrapper around one LRU-K engine
///
/// The engine is only allocated on the first `add`, so a group that never
/// misses never builds it. Every method holds the lock for exactly one
/// engine call.
#[derive(Debug)]
pub(crate) struct Cache {
    config: GroupConfig,

    /// Built lazily on first insert
    lru: Mutex<Option<LruKCache<ByteView>>>,
}

impl Cache {
    pub(crate) fn new(config: GroupConfig) -> Self {
        Self {
            config,
            lru: Mutex::new(None),
        }
    }

    /// Offer a loaded value to the engine's admission policy
    pub(crate) fn add(&self, key: &str, value: ByteView) {
        let mut lru = self.lru.lock();
        let config = &self.config;
        let lru = lru.get_or_insert_with(|| {
            LruKCache::with_on_evicted(
                config.k,
                config.cache_bytes,
                config.history_max,
                Box::new(|key: &str, value: &ByteView| {
                    trace!("evicted {} ({} bytes)", key, value.len());
                }),
            )
        });
        lru.add(key, value);
    }

    /// Look up an admitted value
    pub(crate) fn get(&self, key: &str) -> Option<ByteView> {
        let mut lru = self.lru.lock();
        lru.as_mut()?.get(key).cloned()
    }

    /// Bytes charged to admitted entries
    pub(crate) fn bytes(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, |lru| lru.bytes())
    }

    /// Number of admitted entries
    pub(crate) fn len(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, |lru| lru.len())
    }

    /// Entries evicted since the engine was built
    pub(crate) fn evictions(&self) -> u64 {
        self.lru.lock().as_ref().map_or(0, |lru| lru.evictions())
    }

    #[cfg(test)]
    fn is_allocated(&self) -> bool {
        self.lru.lock().is_some()
    }
}
