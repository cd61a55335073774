//! Repository-level inspection over a built graph.

use std::collections::{BTreeMap, HashMap};

use ckit_core::{EntityStore, Relation, Status};
use rustworkx_core::connectivity::connected_components;
use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::graph::EntityGraph;

/// Overview of entity counts, connectivity, and detected gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_relation: BTreeMap<String, usize>,
    /// Weakly connected component count.
    pub components: usize,
    pub has_cycles: bool,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summarize `graph`, reading titles and statuses from `store`.
///
/// Only entities present in the graph are counted.
#[must_use]
pub fn inspect<S: EntityStore>(graph: &EntityGraph, store: &S) -> GraphSummary {
    let mut by_type = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    let mut gaps = Vec::new();
    let mut blocked = 0;

    for entity in store.entities().filter(|e| graph.contains(&e.id)) {
        *by_type.entry(entity.entity_type.to_string()).or_insert(0) += 1;
        *by_status.entry(entity.status.to_string()).or_insert(0) += 1;
        if entity.status == Status::Blocked {
            blocked += 1;
        }

        if entity.field_text("title").is_none() && entity.field_text("objective").is_none() {
            gaps.push(format!("{}: Missing title/objective", entity.id));
        }
        if !entity.entity_type.allows_status(entity.status) {
            gaps.push(format!(
                "{}: status '{}' is not valid for {}",
                entity.id, entity.status, entity.entity_type
            ));
        }
        if graph.neighbors(&entity.id).is_empty() {
            gaps.push(format!("{}: No relationships", entity.id));
        }
    }
    gaps.extend(graph.warnings().iter().map(ToString::to_string));

    let mut by_relation = BTreeMap::new();
    for edge in graph.edges() {
        *by_relation.entry(edge.relation.to_string()).or_insert(0) += 1;
    }

    let topology = topology(graph);
    let mut recommendations = Vec::new();
    if !gaps.is_empty() {
        recommendations.push(format!("Address {} identified gaps", gaps.len()));
    }
    if blocked > 0 {
        recommendations.push(format!("Review {blocked} blocked items"));
    }

    GraphSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        by_type,
        by_status,
        by_relation,
        components: connected_components(&topology).len(),
        has_cycles: toposort(&topology, None).is_err(),
        gaps,
        recommendations,
    }
}

/// Mirror the graph into petgraph for connectivity and cycle analysis.
fn topology(graph: &EntityGraph) -> DiGraph<&str, Relation> {
    let mut topology = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let index: HashMap<&str, NodeIndex> = graph
        .node_ids()
        .map(|id| (id, topology.add_node(id)))
        .collect();
    for edge in graph.edges() {
        if let (Some(&source), Some(&target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            topology.add_edge(source, target, edge.relation);
        }
    }
    topology
}
