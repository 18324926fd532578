//! Group: a named cache namespace
//!
//! A lookup goes through the local cache first. On a miss the key's load is
//! coalesced so that concurrent callers share one fetch; the fetch asks the
//! registered peer picker for an owner, falls back to the group's getter,
//! and only getter results are offered to the local cache.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::byteview::ByteView;
use crate::cache::Cache;
use crate::config::GroupConfig;
use crate::error::{BoxError, Error, Result};
use crate::peers::{PeerGetter, PeerPicker, Request};
use crate::singleflight::FlightGroup;
use crate::stats::GroupStats;

/// Loads the authoritative value for a key on a cache miss
pub trait Getter: Send + Sync {
    /// Fetch the bytes for `key` from the data source
    fn get(&self, key: &str) -> std::result::Result<Vec<u8>, BoxError>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn get(&self, key: &str) -> std::result::Result<Vec<u8>, BoxError> {
        self(key)
    }
}

/// A cache namespace with its own getter, budget and peers
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    config: GroupConfig,
    main_cache: Cache,
    peers: OnceCell<Arc<dyn PeerPicker>>,
    loader: FlightGroup<Result<ByteView>>,
    stats: GroupStats,
}

impl Group {
    /// Start building a group called `name`
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            config: GroupConfig::default(),
            getter: None,
        }
    }

    /// Get the value for `key`, loading it on a miss
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        self.stats.record_get();
        if let Some(value) = self.main_cache.get(key) {
            self.stats.record_hit();
            debug!("[{}] cache hit for {}", self.name, key);
            return Ok(value);
        }

        self.load(key)
    }

    /// Attach the picker used to route keys to their owning peers
    ///
    /// A group accepts exactly one picker; later calls fail.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| Error::PeersAlreadyRegistered(self.name.clone()))?;
        info!("[{}] peers registered", self.name);
        Ok(())
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sizing and admission settings
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Request counters
    pub fn stats(&self) -> &GroupStats {
        &self.stats
    }

    /// Bytes held by the local cache
    pub fn cache_bytes(&self) -> usize {
        self.main_cache.bytes()
    }

    /// Entries held by the local cache
    pub fn cache_len(&self) -> usize {
        self.main_cache.len()
    }

    /// Entries evicted from the local cache
    pub fn cache_evictions(&self) -> u64 {
        self.main_cache.evictions()
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();

        let mut leader = false;
        let value = self.loader.work(key, || {
            leader = true;

            if let Some(peer) = self.peers.get().and_then(|peers| peers.pick_peer(key)) {
                match self.get_from_peer(peer.as_ref(), key) {
                    Ok(value) => {
                        self.stats.record_peer_load();
                        return Ok(value);
                    }
                    Err(e) => {
                        self.stats.record_peer_error();
                        warn!("[{}] failed to get {} from peer: {}", self.name, key, e);
                    }
                }
            }

            self.get_locally(key)
        });

        if !leader {
            self.stats.record_coalesced();
        }
        value
    }

    fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = Request {
            group: self.name.clone(),
            key: key.to_owned(),
        };
        let response = peer.get(&request).map_err(Error::from_peer)?;
        Ok(ByteView::from(response.value))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.record_local_load_error();
                debug!("[{}] getter failed for {}: {}", self.name, key, e);
                return Err(Error::from_source(e));
            }
        };

        self.stats.record_local_load();
        debug!("[{}] loaded {} ({} bytes)", self.name, key, bytes.len());

        // The getter handed over ownership, so nothing else can mutate these bytes
        let value = ByteView::from(bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .field("loader", &self.loader)
            .finish()
    }
}

/// Builder for [`Group`]
pub struct GroupBuilder {
    name: String,
    config: GroupConfig,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    /// Replace all sizing and admission settings
    pub fn config(mut self, config: GroupConfig) -> Self {
        self.config = config;
        self
    }

    /// Byte budget, 0 for unbounded
    pub fn cache_bytes(mut self, cache_bytes: usize) -> Self {
        self.config.cache_bytes = cache_bytes;
        self
    }

    /// Loads of a key needed before it is cached
    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    /// Number of not-yet-cached keys to track
    pub fn history_max(mut self, history_max: usize) -> Self {
        self.config.history_max = history_max;
        self
    }

    /// Getter called on misses
    pub fn getter<G: Getter + 'static>(self, getter: G) -> Self {
        self.shared_getter(Arc::new(getter))
    }

    /// Getter shared with other groups
    pub fn shared_getter(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Validate the settings and build the group
    pub fn build(self) -> Result<Group> {
        let getter = self
            .getter
            .ok_or_else(|| Error::MissingGetter(self.name.clone()))?;
        self.config.validate()?;

        Ok(Group {
            name: self.name,
            getter,
            config: self.config,
            main_cache: Cache::new(self.config),
            peers: OnceCell::new(),
            loader: FlightGroup::new(),
            stats: GroupStats::new(),
        })
    }
}

impl fmt::Debug for GroupBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("has_getter", &self.getter.is_some())
            .finish()
    }
}
