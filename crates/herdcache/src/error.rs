//! Error types for herdcache

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Error returned by user callbacks (getters and peer getters)
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Callback error shared by every caller coalesced onto one load
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Result type alias for herdcache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache group operations
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Key was empty
    #[error("key is required")]
    EmptyKey,

    /// The group's getter failed to load the key
    #[error(transparent)]
    Source(SharedError),

    /// A peer failed to serve the key
    #[error("peer fetch failed: {0}")]
    Peer(SharedError),

    /// No group registered under this name
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Group was built without a getter
    #[error("group {0} has no getter")]
    MissingGetter(String),

    /// `register_peers` was called more than once
    #[error("peers already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// Group configuration is unusable
    #[error("invalid group config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap a getter error
    pub fn from_source(err: BoxError) -> Self {
        Error::Source(Arc::from(err))
    }

    /// Wrap a peer getter error
    pub fn from_peer(err: BoxError) -> Self {
        Error::Peer(Arc::from(err))
    }
}
