use std::fmt;
use std::str::FromStr;

use ckit_core::{Entity, EntityType, Relation, Severity};
use ckit_graph::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::changes::ChangedFields;
use crate::definition::{ConditionDefinition, RuleDefinition};
use crate::error::RuleParseError;
use crate::template::Template;

/// Wildcard token accepted in rule patterns.
pub const ANY: &str = "*";

/// One slot of a rule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern<T> {
    Any,
    Exact(T),
}

impl<T: Copy> Pattern<T> {
    /// Index key: `None` for the wildcard.
    pub(crate) const fn key(self) -> Option<T> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }
}

impl<T: PartialEq> Pattern<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY),
            Self::Exact(value) => value.fmt(f),
        }
    }
}

/// Which traversal direction along a matching edge fires the rule.
///
/// Patterns always describe the canonical edge `source --kind--> target`.
/// `Downstream` fires when the change sits at the edge source and the
/// neighbor is the target; `Upstream` fires for the reverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleDirection {
    #[default]
    Downstream,
    Upstream,
    Both,
}

impl RuleDirection {
    #[must_use]
    pub const fn fires_on(self, crossing: Direction) -> bool {
        matches!(
            (self, crossing),
            (Self::Both, _)
                | (Self::Downstream, Direction::Outgoing)
                | (Self::Upstream, Direction::Incoming)
        )
    }
}

/// Predicate applied to one field of the changed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The field is among the changed fields.
    Changed,
    Equals(Value),
    NotEquals(Value),
    /// The field is set to a non-null value.
    Present,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCondition {
    pub field: String,
    pub predicate: Predicate,
}

impl FieldCondition {
    /// Evaluate against the changed entity and its changed fields.
    #[must_use]
    pub fn is_satisfied(&self, changed: &Entity, changed_fields: &ChangedFields) -> bool {
        let value = changed.field(&self.field);
        match &self.predicate {
            Predicate::Changed => changed_fields.contains(&self.field),
            Predicate::Equals(expected) => value == Some(expected),
            Predicate::NotEquals(expected) => value != Some(expected),
            Predicate::Present => value.is_some_and(|v| !v.is_null()),
        }
    }

    fn parse(rule: &str, definition: &ConditionDefinition) -> Result<Self, RuleParseError> {
        let malformed = |reason: String| RuleParseError::MalformedCondition {
            rule: rule.to_string(),
            reason,
        };
        if definition.field.trim().is_empty() {
            return Err(malformed("condition field is empty".into()));
        }

        let predicate = match definition.predicate.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "changed" => Predicate::Changed,
            "present" | "exists" => Predicate::Present,
            name @ ("equals" | "eq" | "not-equals" | "ne") => {
                let value = definition.value.clone().ok_or_else(|| {
                    malformed(format!("predicate '{}' requires a value", definition.predicate))
                })?;
                if matches!(name, "equals" | "eq") {
                    Predicate::Equals(value)
                } else {
                    Predicate::NotEquals(value)
                }
            }
            _ => {
                return Err(malformed(format!(
                    "unsupported predicate '{}'",
                    definition.predicate
                )));
            }
        };

        Ok(Self {
            field: definition.field.clone(),
            predicate,
        })
    }
}

/// A validated, immutable consistency rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub source_type: Pattern<EntityType>,
    pub relationship: Pattern<Relation>,
    pub target_type: Pattern<EntityType>,
    pub condition: Option<FieldCondition>,
    pub template: Template,
    pub severity: Severity,
    pub direction: RuleDirection,
}

impl Rule {
    /// Whether the rule's pattern covers an edge of this shape.
    #[must_use]
    pub fn matches_edge(&self, source: EntityType, relation: Relation, target: EntityType) -> bool {
        self.source_type.matches(&source)
            && self.relationship.matches(&relation)
            && self.target_type.matches(&target)
    }
}

impl TryFrom<RuleDefinition> for Rule {
    type Error = RuleParseError;

    fn try_from(definition: RuleDefinition) -> Result<Self, Self::Error> {
        let id = definition.id.trim().to_string();
        let condition = definition
            .condition
            .as_ref()
            .map(|condition| FieldCondition::parse(&id, condition))
            .transpose()?;

        Ok(Self {
            source_type: pattern(&id, "source type", &definition.source_type)?,
            relationship: pattern(&id, "relationship", &definition.relationship)?,
            target_type: pattern(&id, "target type", &definition.target_type)?,
            condition,
            template: Template::parse(&definition.message),
            severity: definition.severity,
            direction: definition.direction,
            id,
        })
    }
}

fn pattern<T>(rule: &str, slot: &str, raw: &str) -> Result<Pattern<T>, RuleParseError>
where
    T: FromStr<Err = ckit_core::CoreError>,
{
    if raw.trim() == ANY {
        return Ok(Pattern::Any);
    }
    raw.parse()
        .map(Pattern::Exact)
        .map_err(|error| RuleParseError::UnknownPattern {
            rule: rule.to_string(),
            reason: format!("{slot}: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use ckit_core::Status;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn definition() -> RuleDefinition {
        RuleDefinition::new("r1", "feature", "implements", "user-story", "{target}")
    }

    #[test]
    fn parses_exact_and_wildcard_patterns() {
        let rule = Rule::try_from(RuleDefinition::new("r", "feature", "*", "user_story", "")).unwrap();
        assert_eq!(rule.source_type, Pattern::Exact(EntityType::Feature));
        assert_eq!(rule.relationship, Pattern::Any);
        assert_eq!(rule.target_type, Pattern::Exact(EntityType::UserStory));
        assert!(rule.matches_edge(EntityType::Feature, Relation::Blocks, EntityType::UserStory));
        assert!(!rule.matches_edge(EntityType::Spec, Relation::Blocks, EntityType::UserStory));
    }

    #[test]
    fn unknown_type_is_unknown_pattern() {
        let err = Rule::try_from(RuleDefinition::new("r", "epic", "implements", "*", "")).unwrap_err();
        assert!(matches!(err, RuleParseError::UnknownPattern { ref rule, .. } if rule == "r"));
    }

    #[test]
    fn unknown_relationship_is_unknown_pattern() {
        let err = Rule::try_from(RuleDefinition::new("r", "*", "supersedes", "*", "")).unwrap_err();
        assert!(matches!(err, RuleParseError::UnknownPattern { .. }));
        assert!(err.to_string().contains("relationship"));
    }

    #[rstest]
    #[case(ConditionDefinition::new("status", "matches-regex"))]
    #[case(ConditionDefinition::new("status", "equals"))]
    #[case(ConditionDefinition::new("", "changed"))]
    fn malformed_conditions_fail(#[case] condition: ConditionDefinition) {
        let err = Rule::try_from(definition().with_condition(condition)).unwrap_err();
        assert!(matches!(err, RuleParseError::MalformedCondition { .. }));
    }

    #[rstest]
    #[case("changed", None, Predicate::Changed)]
    #[case("present", None, Predicate::Present)]
    #[case("equals", Some(json!("done")), Predicate::Equals(json!("done")))]
    #[case("not_equals", Some(json!(3)), Predicate::NotEquals(json!(3)))]
    fn supported_predicates_parse(
        #[case] name: &str,
        #[case] value: Option<Value>,
        #[case] expected: Predicate,
    ) {
        let mut condition = ConditionDefinition::new("status", name);
        condition.value = value;
        let rule = Rule::try_from(definition().with_condition(condition)).unwrap();
        assert_eq!(rule.condition.unwrap().predicate, expected);
    }

    #[test]
    fn conditions_evaluate_against_changed_entity() {
        let entity = Entity::new("FEAT-001", EntityType::Feature, Status::Done)
            .with_field("stage", "done")
            .with_field("owner", Value::Null);
        let all = ChangedFields::All;
        let only_title = ChangedFields::only(["title"]);

        let cond = |field: &str, predicate| FieldCondition {
            field: field.into(),
            predicate,
        };
        assert!(cond("stage", Predicate::Changed).is_satisfied(&entity, &all));
        assert!(!cond("stage", Predicate::Changed).is_satisfied(&entity, &only_title));
        assert!(cond("stage", Predicate::Equals(json!("done"))).is_satisfied(&entity, &all));
        assert!(!cond("stage", Predicate::Equals(json!("draft"))).is_satisfied(&entity, &all));
        assert!(cond("missing", Predicate::NotEquals(json!("x"))).is_satisfied(&entity, &all));
        assert!(cond("stage", Predicate::Present).is_satisfied(&entity, &all));
        assert!(!cond("owner", Predicate::Present).is_satisfied(&entity, &all));
    }

    #[test]
    fn direction_fires_on_crossing() {
        assert!(RuleDirection::Downstream.fires_on(Direction::Outgoing));
        assert!(!RuleDirection::Downstream.fires_on(Direction::Incoming));
        assert!(RuleDirection::Upstream.fires_on(Direction::Incoming));
        assert!(RuleDirection::Both.fires_on(Direction::Outgoing));
        assert!(RuleDirection::Both.fires_on(Direction::Incoming));
    }
}
