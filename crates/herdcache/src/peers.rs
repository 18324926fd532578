//! Peer coordination
//!
//! A group never talks to the network itself. It asks a [`PeerPicker`]
//! whether another node owns a key and, if so, hands a [`Request`] to that
//! node's [`PeerGetter`]. How peers are chosen (a hash ring, a static map)
//! and how the request travels (HTTP, RPC) belong to the implementations.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// Fetch request sent to the peer that owns a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Group (namespace) name
    pub group: String,

    /// Key within the group
    pub key: String,
}

/// Peer's reply: the raw bytes for the requested key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Value bytes
    pub value: Bytes,
}

/// Locates the peer that owns a key
pub trait PeerPicker: Send + Sync {
    /// Return the owning peer, or `None` when this node should serve the
    /// key itself
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches values from one remote peer
pub trait PeerGetter: Send + Sync {
    /// Fetch `request.key` from `request.group` on the peer
    fn get(&self, request: &Request) -> Result<Response, BoxError>;
}

/// Picker for single-node setups: every key is served locally
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPeers;

impl PeerPicker for NoPeers {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        None
    }
}
