use std::collections::HashMap;
use std::path::Path;

use ckit_core::{EntityType, Relation};

use crate::definition::{RuleDefinition, RuleFile};
use crate::error::RuleParseError;
use crate::rule::Rule;

type PatternKey = (Option<EntityType>, Option<Relation>, Option<EntityType>);

/// Immutable, validated collection of rules with an indexed pattern lookup.
///
/// Built once through [`RuleSet::load`]. Reloading means loading a new set
/// and swapping it in; a set is never edited in place.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: HashMap<PatternKey, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl RuleSet {
    /// Validate definitions into a rule set. Definition order is kept and
    /// decides issue order when several rules fire.
    ///
    /// # Errors
    ///
    /// Returns [`RuleParseError`] for an unknown entity type or relationship
    /// kind, a malformed or unsupported condition, a missing id, or a
    /// duplicate id.
    pub fn load(
        definitions: impl IntoIterator<Item = RuleDefinition>,
    ) -> Result<Self, RuleParseError> {
        let mut rules = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for (index, definition) in definitions.into_iter().enumerate() {
            if definition.id.trim().is_empty() {
                return Err(RuleParseError::MissingId { index });
            }
            let rule = Rule::try_from(definition)?;
            if by_id.insert(rule.id.clone(), rules.len()).is_some() {
                return Err(RuleParseError::DuplicateRuleId(rule.id));
            }
            rules.push(rule);
        }

        let mut index: HashMap<PatternKey, Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            let key = (
                rule.source_type.key(),
                rule.relationship.key(),
                rule.target_type.key(),
            );
            index.entry(key).or_default().push(position);
        }

        tracing::info!(rules = rules.len(), "rule set loaded");
        Ok(Self {
            rules,
            index,
            by_id,
        })
    }

    /// Parse a TOML document of `[[rules]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`RuleParseError::Decode`] for invalid TOML, otherwise any
    /// [`RuleSet::load`] error.
    pub fn from_toml_str(document: &str) -> Result<Self, RuleParseError> {
        Self::decode_toml(document, "inline TOML")
    }

    /// Parse a JSON document: either `{"rules": [...]}` or a bare array.
    ///
    /// # Errors
    ///
    /// Returns [`RuleParseError::Decode`] for invalid JSON, otherwise any
    /// [`RuleSet::load`] error.
    pub fn from_json_str(document: &str) -> Result<Self, RuleParseError> {
        Self::decode_json(document, "inline JSON")
    }

    /// Load rules from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleParseError::Io`] if the file cannot be read,
    /// [`RuleParseError::UnsupportedFormat`] for other extensions, and any
    /// decode or validation error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleParseError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        if !matches!(extension.as_deref(), Some("toml" | "json")) {
            return Err(RuleParseError::UnsupportedFormat(path.to_path_buf()));
        }

        let document = std::fs::read_to_string(path).map_err(|source| RuleParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading rule file");

        let origin = path.display().to_string();
        if extension.as_deref() == Some("toml") {
            Self::decode_toml(&document, &origin)
        } else {
            Self::decode_json(&document, &origin)
        }
    }

    fn decode_toml(document: &str, origin: &str) -> Result<Self, RuleParseError> {
        let file: RuleFile = toml::from_str(document).map_err(|e| RuleParseError::Decode {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        Self::load(file.rules)
    }

    fn decode_json(document: &str, origin: &str) -> Result<Self, RuleParseError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Document {
            List(Vec<RuleDefinition>),
            File(RuleFile),
        }

        let document: Document =
            serde_json::from_str(document).map_err(|e| RuleParseError::Decode {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        match document {
            Document::List(rules) => Self::load(rules),
            Document::File(file) => Self::load(file.rules),
        }
    }

    /// Rules whose pattern matches the edge shape, in definition order.
    ///
    /// Probes the index once per exact/wildcard combination of the three
    /// slots, never scanning the full rule list.
    #[must_use]
    pub fn matching(
        &self,
        source: EntityType,
        relation: Relation,
        target: EntityType,
    ) -> Vec<&Rule> {
        let mut positions: Vec<usize> = Vec::new();
        for source_key in [Some(source), None] {
            for relation_key in [Some(relation), None] {
                for target_key in [Some(target), None] {
                    if let Some(found) = self.index.get(&(source_key, relation_key, target_key)) {
                        positions.extend_from_slice(found);
                    }
                }
            }
        }
        positions.sort_unstable();
        positions.into_iter().map(|p| &self.rules[p]).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.by_id.get(id).map(|&position| &self.rules[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids<'a>(rules: &[&'a Rule]) -> Vec<&'a str> {
        rules.iter().map(|rule| rule.id.as_str()).collect()
    }

    fn sample() -> RuleSet {
        RuleSet::load([
            RuleDefinition::new("any-from-feature", "feature", "*", "*", ""),
            RuleDefinition::new("story", "feature", "implements", "user-story", ""),
            RuleDefinition::new("deps", "*", "depends-on", "package", ""),
            RuleDefinition::new("everything", "*", "*", "*", ""),
            RuleDefinition::new("spec-only", "spec", "specifies", "feature", ""),
        ])
        .unwrap()
    }

    #[test]
    fn matching_keeps_definition_order() {
        let set = sample();
        assert_eq!(
            ids(&set.matching(EntityType::Feature, Relation::Implements, EntityType::UserStory)),
            vec!["any-from-feature", "story", "everything"]
        );
        assert_eq!(
            ids(&set.matching(EntityType::Service, Relation::DependsOn, EntityType::Package)),
            vec!["deps", "everything"]
        );
        assert_eq!(
            ids(&set.matching(EntityType::Task, Relation::Blocks, EntityType::Task)),
            vec!["everything"]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = RuleSet::load([
            RuleDefinition::new("dup", "feature", "*", "*", ""),
            RuleDefinition::new("dup", "spec", "*", "*", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, RuleParseError::DuplicateRuleId(id) if id == "dup"));
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = RuleSet::load([
            RuleDefinition::new("ok", "feature", "*", "*", ""),
            RuleDefinition::new("  ", "spec", "*", "*", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, RuleParseError::MissingId { index: 1 }));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = RuleSet::load(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert!(set.matching(EntityType::Feature, Relation::Uses, EntityType::Service).is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let set = sample();
        assert_eq!(set.len(), 5);
        for rule in set.iter() {
            assert_eq!(set.get(&rule.id).map(|found| found.id.as_str()), Some(rule.id.as_str()));
        }
        assert_eq!(
            set.get("spec-only").map(|rule| rule.relationship.key()),
            Some(Some(Relation::Specifies))
        );
        assert!(set.get("nope").is_none());
        assert_eq!(set.iter().next().map(|r| r.id.as_str()), Some("any-from-feature"));
    }
}
