//! Rule definitions as authored in rule files.
//!
//! Definitions are plain records. Validation happens once, in
//! [`RuleSet::load`](crate::RuleSet::load).

use ckit_core::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rule::RuleDirection;

/// One rule as written by a user.
///
/// Type and relationship names are kept as strings so that an unknown name
/// surfaces as a [`RuleParseError::UnknownPattern`](crate::RuleParseError)
/// naming the rule, rather than as a decode failure. `"*"` matches anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub id: String,
    pub source_type: String,
    pub relationship: String,
    pub target_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionDefinition>,
    #[serde(alias = "template", alias = "messageTemplate")]
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub direction: RuleDirection,
}

impl RuleDefinition {
    /// Definition with no condition, `info` severity, and downstream
    /// direction.
    pub fn new(
        id: impl Into<String>,
        source_type: impl Into<String>,
        relationship: impl Into<String>,
        target_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_type: source_type.into(),
            relationship: relationship.into(),
            target_type: target_type.into(),
            condition: None,
            message: message.into(),
            severity: Severity::default(),
            direction: RuleDirection::default(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: RuleDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ConditionDefinition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// Field condition as authored: `{ field, predicate, value? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDefinition {
    pub field: String,
    pub predicate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ConditionDefinition {
    pub fn new(field: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            predicate: predicate.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A rule document: `[[rules]]` tables in TOML or `{"rules": [...]}` in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}
