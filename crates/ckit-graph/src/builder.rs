use std::collections::{BTreeMap, HashSet};

use ckit_core::{Entity, EntityType, Relation};
use serde_json::Value;

use crate::error::GraphBuildError;
use crate::graph::{Edge, EntityGraph, GraphWarning};
use crate::relationship::{Orientation, relationship_fields};

/// Build the directed entity graph from the full entity collection.
///
/// Entities are processed in id order, so edge order does not depend on the
/// order the store yields them. An edge declared from both endpoints is kept
/// once. Dangling targets, self references, and malformed relationship
/// values are recorded as warnings and skipped.
///
/// # Errors
///
/// Returns [`GraphBuildError::DuplicateId`] if two entities share an id.
pub fn build<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
) -> Result<EntityGraph, GraphBuildError> {
    let mut by_id: BTreeMap<&str, &Entity> = BTreeMap::new();
    for entity in entities {
        if by_id.insert(entity.id.as_str(), entity).is_some() {
            return Err(GraphBuildError::DuplicateId {
                id: entity.id.clone(),
            });
        }
    }

    let nodes: BTreeMap<String, EntityType> = by_id
        .values()
        .map(|entity| (entity.id.clone(), entity.entity_type))
        .collect();
    let mut graph = EntityGraph::with_nodes(nodes);
    let mut seen: HashSet<(String, String, Relation)> = HashSet::new();

    for entity in by_id.values() {
        for spec in relationship_fields(entity.entity_type) {
            let Some(value) = entity.field(spec.field) else {
                continue;
            };
            let Some(targets) = declared_ids(value) else {
                tracing::warn!(entity = %entity.id, field = spec.field, "malformed relationship field");
                graph.push_warning(GraphWarning::MalformedRelationship {
                    entity: entity.id.clone(),
                    field: spec.field.to_string(),
                });
                continue;
            };

            for target in targets {
                if target == entity.id {
                    tracing::warn!(
                        entity = %entity.id,
                        field = spec.field,
                        "ignoring self-reference"
                    );
                    graph.push_warning(GraphWarning::SelfLoop {
                        entity: entity.id.clone(),
                        field: spec.field.to_string(),
                    });
                    continue;
                }
                let Some(other) = by_id.get(target) else {
                    tracing::warn!(
                        entity = %entity.id,
                        field = spec.field,
                        missing = target,
                        "dropping edge to unknown entity"
                    );
                    graph.push_warning(GraphWarning::DanglingEdge {
                        entity: entity.id.clone(),
                        field: spec.field.to_string(),
                        missing: target.to_string(),
                    });
                    continue;
                };

                let (source, target) = match spec.orientation {
                    Orientation::Outgoing => (*entity, *other),
                    Orientation::Incoming => (*other, *entity),
                };
                if !seen.insert((source.id.clone(), target.id.clone(), spec.relation)) {
                    continue;
                }
                graph.push_edge(Edge {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    relation: spec.relation,
                    source_type: source.entity_type,
                    target_type: target.entity_type,
                });
            }
        }
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        warnings = graph.warnings().len(),
        "entity graph built"
    );
    Ok(graph)
}

/// A single id or a list of ids. `None` if any element is not a string.
fn declared_ids(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::String(id) => Some(vec![id.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}
