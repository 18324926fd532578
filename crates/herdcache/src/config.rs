//! Group configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sizing and admission settings for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Byte budget for keys plus values, 0 for unbounded
    pub cache_bytes: usize,

    /// Loads of a key needed before it is cached (1 = plain LRU)
    pub k: usize,

    /// Number of not-yet-cached keys whose loads are counted
    pub history_max: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            cache_bytes: 2 << 10,
            k: 2,
            history_max: 30,
        }
    }
}

impl GroupConfig {
    /// Reject settings under which the cache could never admit anything
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.k > 1 && self.history_max == 0 {
            return Err(Error::InvalidConfig(format!(
                "history_max must be non-zero when k is {}",
                self.k
            )));
        }
        Ok(())
    }
}
