//! Impact analysis defaults.

use ckit_core::Severity;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_max_depth() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImpactConfig {
    /// Traversal depth from the changed entities. Ignored when `unbounded`.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Follow relationships until nothing new is reached.
    #[serde(default)]
    pub unbounded: bool,

    /// Lowest issue severity that marks an entity stale.
    #[serde(default)]
    pub stale_threshold: Severity,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            unbounded: false,
            stale_threshold: Severity::default(),
        }
    }
}

impl ImpactConfig {
    /// Reject settings that would make every analysis empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `max_depth` is zero on a
    /// bounded traversal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 && !self.unbounded {
            return Err(ConfigError::InvalidValue {
                field: "impact.max_depth".into(),
                reason: "must be at least 1 (set impact.unbounded for no limit)".into(),
            });
        }
        Ok(())
    }
}
