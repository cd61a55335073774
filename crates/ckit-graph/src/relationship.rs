//! Recognized relationship fields per entity type.
//!
//! A relationship may be declared on either endpoint. The table records, for
//! each declaring type and field, which relation the field encodes and
//! whether the declaring entity is the source or the target of the
//! canonical edge. `feature.userStories` and `user-story.feature` both
//! produce `feature --implements--> user-story`.

use ckit_core::{EntityType, Relation};

/// Which end of the canonical edge the declaring entity sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Declaring entity is the edge source.
    Outgoing,
    /// Declaring entity is the edge target.
    Incoming,
}

/// One recognized relationship field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipField {
    pub field: &'static str,
    pub relation: Relation,
    pub orientation: Orientation,
}

const fn out(field: &'static str, relation: Relation) -> RelationshipField {
    RelationshipField {
        field,
        relation,
        orientation: Orientation::Outgoing,
    }
}

const fn inv(field: &'static str, relation: Relation) -> RelationshipField {
    RelationshipField {
        field,
        relation,
        orientation: Orientation::Incoming,
    }
}

const FEATURE: &[RelationshipField] = &[
    out("userStories", Relation::Implements),
    inv("specs", Relation::Specifies),
    inv("tasks", Relation::Delivers),
    out("services", Relation::Uses),
    out("packages", Relation::DependsOn),
    out("requires", Relation::DependsOn),
    out("blocks", Relation::Blocks),
    out("relatesTo", Relation::RelatesTo),
];

const USER_STORY: &[RelationshipField] = &[
    inv("feature", Relation::Implements),
    inv("specs", Relation::Specifies),
    out("blocks", Relation::Blocks),
    out("relatesTo", Relation::RelatesTo),
];

const SPEC: &[RelationshipField] = &[
    out("feature", Relation::Specifies),
    out("userStories", Relation::Specifies),
    out("derivedFrom", Relation::DerivedFrom),
    out("relatesTo", Relation::RelatesTo),
];

const TASK: &[RelationshipField] = &[
    out("feature", Relation::Delivers),
    out("specs", Relation::Implements),
    out("dependsOn", Relation::DependsOn),
    out("blocks", Relation::Blocks),
];

const SERVICE: &[RelationshipField] = &[
    out("consumes", Relation::Consumes),
    out("provides", Relation::Provides),
    out("packages", Relation::DependsOn),
    out("dependsOn", Relation::DependsOn),
];

const PACKAGE: &[RelationshipField] = &[
    out("dependsOn", Relation::DependsOn),
    inv("usedBy", Relation::Uses),
];

/// Relationship fields recognized on entities of `entity_type`, in
/// extraction order.
#[must_use]
pub const fn relationship_fields(entity_type: EntityType) -> &'static [RelationshipField] {
    match entity_type {
        EntityType::Feature => FEATURE,
        EntityType::UserStory => USER_STORY,
        EntityType::Spec => SPEC,
        EntityType::Task => TASK,
        EntityType::Service => SERVICE,
        EntityType::Package => PACKAGE,
    }
}
