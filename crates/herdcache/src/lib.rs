//! # herdcache
//!
//! Read-through cache groups for slow or rate-limited data sources.
//!
//! ## Architecture
//! - **Group**: named namespace with a getter, a local cache and optional peers
//! - **Cache**: `herdlru` LRU-K engine behind a mutex, built on first insert
//! - **FlightGroup**: one in-flight load per key, shared by every waiting caller
//! - **Peers**: `PeerPicker` / `PeerGetter` traits, transport left to implementors
//! - **Registry**: explicit name -> group map behind a read-mostly lock
//!
//! ## Request path
//! 1. `Group::get` checks the local cache; a hit returns immediately
//! 2. A miss enters the `FlightGroup` for that key
//! 3. The leader asks the picker for an owning peer and fetches from it
//! 4. No peer, or the peer failed: the getter loads the value and the
//!    local cache gets a chance to admit it
//! 5. Every caller waiting on the key receives the same result
//!
//! ## Example
//!
//! ```
//! use herdcache::{BoxError, GroupConfig, Registry};
//!
//! let registry = Registry::new();
//! registry
//!     .new_group("scores", GroupConfig::default(), |key: &str| -> Result<Vec<u8>, BoxError> {
//!         match key {
//!             "Tom" => Ok(b"630".to_vec()),
//!             _ => Err(format!("{} not exist", key).into()),
//!         }
//!     })
//!     .unwrap();
//!
//! let view = registry.get("scores", "Tom").unwrap();
//! assert_eq!(view.to_string(), "630");
//! ```

#![warn(missing_docs)]

mod byteview;
mod cache;
mod config;
mod error;
mod group;
mod peers;
mod registry;
mod singleflight;
mod stats;

pub use byteview::ByteView;
pub use config::GroupConfig;
pub use error::{BoxError, Error, Result, SharedError};
pub use group::{Getter, Group, GroupBuilder};
pub use peers::{NoPeers, PeerGetter, PeerPicker, Request, Response};
pub use registry::Registry;
pub use singleflight::FlightGroup;
pub use stats::GroupStats;
