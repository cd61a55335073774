//! # ckit-impact
//!
//! Answers "if these entities change, what else becomes suspect, and why?"
//!
//! [`analyze`] walks the [`EntityGraph`](ckit_graph::EntityGraph) outward
//! from the changed ids, evaluates the [`RuleSet`](ckit_rules::RuleSet) on
//! every crossed edge, and returns an [`ImpactReport`](ckit_core::ImpactReport)
//! of impacted ids, stale ids, and deduplicated issues.
//!
//! Graphs and rule sets are immutable; [`Published`] holds the current one
//! of each and swaps in replacements without disturbing running analyses.

mod analyzer;
mod error;
mod options;
mod snapshot;

pub use analyzer::{Change, ImpactAnalyzer, analyze, analyze_changes};
pub use error::UnknownEntityError;
pub use options::{ImpactOptions, StalenessPolicy};
pub use snapshot::{GraphHandle, Published, RuleSetHandle};
