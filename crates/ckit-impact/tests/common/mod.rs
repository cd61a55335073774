//! Shared fixture: a nine-entity product corpus with 26 distinct edges across
//! nine relationship kinds. FEAT-001 touches every other entity.

#![allow(dead_code)]

use ckit_core::{Entity, EntityCatalog, EntityStore, EntityType, Status};
use ckit_graph::{EntityGraph, build};
use ckit_rules::{RuleDefinition, RuleDirection, RuleSet};

pub fn entities() -> Vec<Entity> {
    vec![
        Entity::new("FEAT-001", EntityType::Feature, Status::InProgress)
            .with_field("title", "Impact analysis")
            .with_field("userStories", vec!["US-001", "US-002"])
            .with_field("specs", vec!["SPEC-001"])
            .with_field("tasks", vec!["TASK-001"])
            .with_field("services", vec!["SVC-001"])
            .with_field("packages", vec!["PKG-001", "PKG-002"])
            .with_field("blocks", vec!["FEAT-002"])
            .with_field("relatesTo", vec!["FEAT-002"]),
        Entity::new("FEAT-002", EntityType::Feature, Status::Planned)
            .with_field("title", "Stale markers")
            .with_field("services", vec!["SVC-001"])
            .with_field("packages", vec!["PKG-002"])
            .with_field("tasks", vec!["TASK-001"])
            .with_field("relatesTo", vec!["US-002"]),
        Entity::new("US-001", EntityType::UserStory, Status::Proposed)
            .with_field("title", "See what a change touches")
            .with_field("feature", "FEAT-001")
            .with_field("relatesTo", vec!["US-002"]),
        Entity::new("US-002", EntityType::UserStory, Status::Draft)
            .with_field("title", "Review stale entities")
            .with_field("blocks", vec!["US-001"]),
        Entity::new("SPEC-001", EntityType::Spec, Status::Active)
            .with_field("title", "Impact engine")
            .with_field("feature", "FEAT-001")
            .with_field("userStories", vec!["US-001", "US-002"])
            .with_field("derivedFrom", vec!["US-001"]),
        Entity::new("TASK-001", EntityType::Task, Status::InProgress)
            .with_field("title", "Build traversal")
            .with_field("specs", vec!["SPEC-001"])
            .with_field("dependsOn", vec!["PKG-001"])
            .with_field("blocks", vec!["US-002"]),
        Entity::new("SVC-001", EntityType::Service, Status::Active)
            .with_field("title", "Analysis service")
            .with_field("consumes", vec!["PKG-001", "PKG-002"])
            .with_field("dependsOn", vec!["PKG-002"]),
        Entity::new("PKG-001", EntityType::Package, Status::Active)
            .with_field("title", "graph-core")
            .with_field("version", "1.4.0")
            .with_field("usedBy", vec!["SVC-001"]),
        Entity::new("PKG-002", EntityType::Package, Status::Active)
            .with_field("title", "rules-engine")
            .with_field("version", "0.9.2")
            .with_field("dependsOn", vec!["PKG-001"]),
    ]
}

pub fn catalog() -> EntityCatalog {
    EntityCatalog::from_entities(entities()).unwrap()
}

pub fn graph(store: &EntityCatalog) -> EntityGraph {
    build(store.entities()).unwrap()
}

/// "A feature change impacts all related entities": one rule per edge
/// direction, since a feature can sit at either end.
pub fn feature_rules() -> RuleSet {
    RuleSet::load([
        RuleDefinition::new(
            "feature-downstream",
            "feature",
            "*",
            "*",
            "{target} is linked from changed feature {source} ({relationship})",
        ),
        RuleDefinition::new(
            "feature-upstream",
            "*",
            "*",
            "feature",
            "{target} links to changed feature {source} ({relationship})",
        )
        .with_direction(RuleDirection::Upstream),
    ])
    .unwrap()
}

/// Everything that depends on a changed package.
pub fn package_rules() -> RuleSet {
    RuleSet::load([RuleDefinition::new(
        "package-consumers",
        "*",
        "depends-on",
        "package",
        "{target} depends on changed {source}",
    )
    .with_direction(RuleDirection::Upstream)])
    .unwrap()
}
