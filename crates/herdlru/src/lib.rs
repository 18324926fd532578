//! # herdlru
//!
//! Byte-budgeted LRU-K eviction engine.
//!
//! ## Architecture
//! - **Cache tier**: admitted entries, slab-backed recency list + AHash index (O(1))
//! - **History tier**: bounded list of keys seen fewer than K times, with visit counts
//! - **Budget**: `len(key) + len(value)` summed over admitted entries, 0 = unbounded
//!
//! A key needs K visits before it is admitted, so a one-off scan over many
//! distinct keys churns the history tier instead of flushing hot entries.
//! The engine is single-threaded; callers wrap it in a lock.

#![warn(missing_docs)]

mod list;
mod lru;

pub use lru::{LruKCache, OnEvicted, Value};
