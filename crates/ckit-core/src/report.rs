//! Issue and impact report types.
//!
//! Field names are part of the contract with rendering and persistence
//! layers and serialize in camelCase (`changedIds`, `totalStale`, ...).

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// One explainable consequence of a rule firing for a changed/affected pair.
///
/// Issues are deduplicated on `(rule_id, entity_id, changed_entity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    /// The affected neighbor.
    pub entity_id: String,
    /// The changed entity the traversal started from.
    pub changed_entity_id: String,
    pub reason: String,
    pub severity: Severity,
}

impl Issue {
    /// Deduplication key.
    #[must_use]
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.rule_id, &self.entity_id, &self.changed_entity_id)
    }
}

/// Snapshot result of one impact analysis.
///
/// `impacted_ids` is in breadth-first discovery order and never contains a
/// changed id. `stale_ids` preserves that order and is a subset of
/// `impacted_ids`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub changed_ids: BTreeSet<String>,
    pub impacted_ids: Vec<String>,
    pub stale_ids: Vec<String>,
    pub issues: Vec<Issue>,
    pub total_stale: usize,
}

impl ImpactReport {
    /// Report for an empty change set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_impacted(&self, id: &str) -> bool {
        self.impacted_ids.iter().any(|impacted| impacted == id)
    }

    #[must_use]
    pub fn is_stale(&self, id: &str) -> bool {
        self.stale_ids.iter().any(|stale| stale == id)
    }

    /// Issues affecting `id`, in report order.
    pub fn issues_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |issue| issue.entity_id == id)
    }

    /// Serialize as pretty JSON for persistence or rendering.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restore a report previously written with [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `json` is not a valid report.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
