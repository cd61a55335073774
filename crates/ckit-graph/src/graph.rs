use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use ckit_core::{EntityType, Relation};
use serde::{Deserialize, Serialize};

/// A canonical, directed relationship between two entities in the graph.
///
/// Endpoint types are recorded on the edge so rule lookup never needs the
/// entity records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub source_type: EntityType,
    pub target_type: EntityType,
}

impl Edge {
    /// The endpoint opposite `id`, if `id` is an endpoint.
    #[must_use]
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.source, self.relation, self.target)
    }
}

/// Direction an edge is crossed from the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// From the edge source towards its target.
    Outgoing,
    /// From the edge target back towards its source.
    Incoming,
}

/// An adjacent node reached through one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor<'g> {
    pub id: &'g str,
    pub edge: &'g Edge,
    pub direction: Direction,
}

/// Non-fatal inconsistency found while building the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GraphWarning {
    /// A relationship field names an id that is not in the collection.
    DanglingEdge {
        entity: String,
        field: String,
        missing: String,
    },
    /// A relationship field value is not a string or a list of strings.
    MalformedRelationship { entity: String, field: String },
    /// A relationship field names the declaring entity itself.
    SelfLoop { entity: String, field: String },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge {
                entity,
                field,
                missing,
            } => write!(f, "{entity}: {field} references unknown entity {missing}"),
            Self::MalformedRelationship { entity, field } => {
                write!(f, "{entity}: {field} is not an id or list of ids")
            }
            Self::SelfLoop { entity, field } => write!(f, "{entity}: {field} references itself"),
        }
    }
}

type Adjacency = HashMap<String, BTreeMap<Relation, Vec<usize>>>;

/// Immutable directed graph over entity ids.
///
/// Owns ids, endpoint types, and edge records only; entity data stays in
/// the store. Safe to share across concurrent analyses.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    nodes: BTreeMap<String, EntityType>,
    edges: Vec<Edge>,
    outgoing: Adjacency,
    incoming: Adjacency,
    warnings: Vec<GraphWarning>,
}

impl EntityGraph {
    pub(crate) fn with_nodes(nodes: BTreeMap<String, EntityType>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Insert a canonical edge. Both endpoints must already be nodes.
    pub(crate) fn push_edge(&mut self, edge: Edge) {
        let index = self.edges.len();
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .entry(edge.relation)
            .or_default()
            .push(index);
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .entry(edge.relation)
            .or_default()
            .push(index);
        self.edges.push(edge);
    }

    pub(crate) fn push_warning(&mut self, warning: GraphWarning) {
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node_type(&self, id: &str) -> Option<EntityType> {
        self.nodes.get(id).copied()
    }

    /// Node ids in sorted order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// Edges leaving `id` with the given relation ("what do I point at").
    pub fn outgoing(&self, id: &str, relation: Relation) -> impl Iterator<Item = &Edge> {
        self.indexed(&self.outgoing, id, Some(relation))
    }

    /// Edges arriving at `id` with the given relation ("what points at me").
    pub fn incoming(&self, id: &str, relation: Relation) -> impl Iterator<Item = &Edge> {
        self.indexed(&self.incoming, id, Some(relation))
    }

    /// All edges leaving `id`, grouped by relation.
    pub fn outgoing_all(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.indexed(&self.outgoing, id, None)
    }

    /// All edges arriving at `id`, grouped by relation.
    pub fn incoming_all(&self, id: &str) -> impl Iterator<Item = &Edge> {
        self.indexed(&self.incoming, id, None)
    }

    fn indexed<'g>(
        &'g self,
        adjacency: &'g Adjacency,
        id: &str,
        relation: Option<Relation>,
    ) -> impl Iterator<Item = &'g Edge> + 'g {
        adjacency
            .get(id)
            .into_iter()
            .flat_map(move |by_relation| {
                by_relation
                    .iter()
                    .filter(move |(kind, _)| relation.is_none_or(|wanted| **kind == wanted))
                    .flat_map(|(_, indices)| indices.iter())
            })
            .map(|&index| &self.edges[index])
    }

    /// Every edge touching `id` in either direction.
    ///
    /// Sorted by neighbor id, then relation, then direction, so callers get
    /// the same order on every run.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<Neighbor<'_>> {
        let forward = self.outgoing_all(id).map(|edge| Neighbor {
            id: &edge.target,
            edge,
            direction: Direction::Outgoing,
        });
        let backward = self.incoming_all(id).map(|edge| Neighbor {
            id: &edge.source,
            edge,
            direction: Direction::Incoming,
        });
        let mut neighbors: Vec<Neighbor<'_>> = forward.chain(backward).collect();
        neighbors.sort_by(|a, b| {
            a.id.cmp(b.id)
                .then(a.edge.relation.cmp(&b.edge.relation))
                .then(a.direction.cmp(&b.direction))
        });
        neighbors
    }

    /// Ids adjacent to `id` through any edge, sorted and deduplicated.
    #[must_use]
    pub fn related(&self, id: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self.neighbors(id).into_iter().map(|n| n.id).collect();
        ids.dedup();
        ids
    }

    /// Shortest chain of ids linking `from` to `to`, ignoring edge direction.
    ///
    /// Ties resolve towards the lexicographically smaller neighbor.
    #[must_use]
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to.to_string()];
                let mut cursor = to;
                while let Some(&parent) = parents.get(cursor) {
                    path.push(parent.to_string());
                    cursor = parent;
                }
                path.reverse();
                return Some(path);
            }
            for neighbor in self.related(current) {
                if seen.insert(neighbor) {
                    parents.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn edge(source: &str, relation: Relation, target: &str) -> Edge {
        Edge {
            source: source.into(),
            target: target.into(),
            relation,
            source_type: EntityType::Task,
            target_type: EntityType::Task,
        }
    }

    fn chain() -> EntityGraph {
        let nodes = ["T-1", "T-2", "T-3", "T-4"]
            .into_iter()
            .map(|id| (id.to_string(), EntityType::Task))
            .collect();
        let mut graph = EntityGraph::with_nodes(nodes);
        graph.push_edge(edge("T-1", Relation::DependsOn, "T-2"));
        graph.push_edge(edge("T-3", Relation::Blocks, "T-2"));
        graph.push_edge(edge("T-3", Relation::DependsOn, "T-4"));
        graph.push_edge(edge("T-1", Relation::Blocks, "T-2"));
        graph
    }

    #[test]
    fn adjacency_by_relation() {
        let graph = chain();
        let targets: Vec<&str> = graph
            .outgoing("T-1", Relation::DependsOn)
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(targets, vec!["T-2"]);

        let blockers: Vec<&str> = graph
            .incoming("T-2", Relation::Blocks)
            .map(|e| e.source.as_str())
            .collect();
        assert_eq!(blockers, vec!["T-3", "T-1"]);
        assert_eq!(graph.incoming("T-2", Relation::Consumes).count(), 0);
        assert_eq!(graph.outgoing_all("unknown").count(), 0);
    }

    #[test]
    fn neighbors_are_sorted_and_bidirectional() {
        let graph = chain();
        let seen: Vec<(&str, Relation, Direction)> = graph
            .neighbors("T-2")
            .into_iter()
            .map(|n| (n.id, n.edge.relation, n.direction))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("T-1", Relation::DependsOn, Direction::Incoming),
                ("T-1", Relation::Blocks, Direction::Incoming),
                ("T-3", Relation::Blocks, Direction::Incoming),
            ]
        );
        assert_eq!(graph.related("T-2"), vec!["T-1", "T-3"]);
    }

    #[test]
    fn shortest_path_ignores_direction() {
        let graph = chain();
        assert_eq!(
            graph.shortest_path("T-1", "T-4"),
            Some(vec![
                "T-1".to_string(),
                "T-2".to_string(),
                "T-3".to_string(),
                "T-4".to_string()
            ])
        );
        assert_eq!(graph.shortest_path("T-1", "T-1"), Some(vec!["T-1".to_string()]));
        assert_eq!(graph.shortest_path("T-1", "missing"), None);
    }

    #[test]
    fn edge_other_endpoint() {
        let e = edge("T-1", Relation::DependsOn, "T-2");
        assert_eq!(e.other("T-1"), Some("T-2"));
        assert_eq!(e.other("T-2"), Some("T-1"));
        assert_eq!(e.other("T-9"), None);
        assert_eq!(e.to_string(), "T-1 --depends-on--> T-2");
    }
}
