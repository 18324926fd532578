//! Registry: groups by name
//!
//! Built once at startup and passed to whatever needs to resolve a group by
//! name (a peer transport serving [`Request`](crate::Request)s, an API
//! layer). Lookups share a read lock; inserts take the write lock.

use std::collections::HashMap;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::info;

use crate::byteview::ByteView;
use crate::config::GroupConfig;
use crate::error::{Error, Result};
use crate::group::{Getter, Group};

/// Named groups living in this process
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>, RandomState>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group and register it under `name`
    ///
    /// # Arguments
    /// * `name` - Namespace name, replaces any group already registered under it
    /// * `config` - Byte budget, K and history capacity
    /// * `getter` - Source loader called on misses
    ///
    /// # Returns
    /// * `Result<Arc<Group>>` - The registered group
    pub fn new_group<G: Getter + 'static>(
        &self,
        name: impl Into<String>,
        config: GroupConfig,
        getter: G,
    ) -> Result<Arc<Group>> {
        let group = Group::builder(name).config(config).getter(getter).build()?;
        Ok(self.register(group))
    }

    /// Register an already built group, replacing any group of the same name
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let name = group.name().to_owned();

        let replaced = self.groups.write().insert(name, Arc::clone(&group));
        if replaced.is_some() {
            info!("Replaced group {}", group.name());
        } else {
            info!("Registered group {}", group.name());
        }

        group
    }

    /// Group registered under `name`
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Get `key` from the group registered under `namespace`
    pub fn get(&self, namespace: &str, key: &str) -> Result<ByteView> {
        let group = self
            .get_group(namespace)
            .ok_or_else(|| Error::NoSuchGroup(namespace.to_owned()))?;
        group.get(key)
    }

    /// Names of all registered groups, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered groups
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Check if no group is registered
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
