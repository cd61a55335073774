use ckit_config::ImpactConfig;
use ckit_core::{Issue, Severity};

/// Decides which issues make their affected entity stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StalenessPolicy {
    /// Minimum severity that marks an entity stale. `Info` means any issue.
    pub threshold: Severity,
}

impl StalenessPolicy {
    #[must_use]
    pub const fn at_least(threshold: Severity) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn marks(&self, issue: &Issue) -> bool {
        issue.severity >= self.threshold
    }
}

/// Per-call analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactOptions {
    /// Maximum traversal depth from the changed set. `None` is unbounded.
    pub max_depth: Option<usize>,
    pub staleness: StalenessPolicy,
}

impl Default for ImpactOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(1),
            staleness: StalenessPolicy::default(),
        }
    }
}

impl ImpactOptions {
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_depth = None;
        self
    }

    #[must_use]
    pub const fn with_stale_threshold(mut self, threshold: Severity) -> Self {
        self.staleness = StalenessPolicy::at_least(threshold);
        self
    }

    /// Whether a node at `depth` may still be expanded.
    pub(crate) fn expands(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl From<&ImpactConfig> for ImpactOptions {
    fn from(config: &ImpactConfig) -> Self {
        let options = Self::default().with_stale_threshold(config.stale_threshold);
        if config.unbounded {
            options.unbounded()
        } else {
            options.with_max_depth(usize::try_from(config.max_depth).unwrap_or(usize::MAX))
        }
    }
}
