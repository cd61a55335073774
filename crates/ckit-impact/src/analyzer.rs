//! Breadth-first impact propagation.
//!
//! Traversal starts from every changed id at depth 0 and walks edges in
//! both directions. Each crossed edge is handed to the rule engine with the
//! changed entity that opened the branch; direction-specific behavior lives
//! in the rules. Each changed id explores its own neighborhood, so a node
//! shared by two changed ids is expanded once per id and issues for both
//! are found. Neighbors are visited in `(id, relation, direction)` order
//! and changed ids are queued sorted, so reports are reproducible.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use ckit_core::{EntityStore, ImpactReport, Issue};
use ckit_graph::EntityGraph;
use ckit_rules::{ChangedFields, RuleContext, RuleSet, evaluate};

use crate::error::UnknownEntityError;
use crate::options::ImpactOptions;

/// One changed entity and which of its fields changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub id: String,
    pub fields: ChangedFields,
}

impl Change {
    /// Every field of `id` counts as changed.
    pub fn all(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: ChangedFields::All,
        }
    }

    /// Only the listed fields of `id` changed.
    pub fn fields<I, S>(id: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            fields: ChangedFields::only(fields),
        }
    }
}

/// Runs impact analyses against one graph, rule set, and entity store.
///
/// Holds borrows only; callers keep the graph and rule set alive, usually
/// as snapshots taken from a [`Published`](crate::Published) cell.
#[derive(Debug)]
pub struct ImpactAnalyzer<'a, S> {
    graph: &'a EntityGraph,
    rules: &'a RuleSet,
    store: &'a S,
    options: ImpactOptions,
}

impl<'a, S: EntityStore> ImpactAnalyzer<'a, S> {
    pub fn new(graph: &'a EntityGraph, rules: &'a RuleSet, store: &'a S) -> Self {
        Self {
            graph,
            rules,
            store,
            options: ImpactOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: ImpactOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &ImpactOptions {
        &self.options
    }

    /// Analyze a set of changed ids, treating every field as changed.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEntityError`] for the first id (in sorted order) that
    /// is not a node of the graph.
    pub fn analyze<I, T>(&self, changed_ids: I) -> Result<ImpactReport, UnknownEntityError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let changes = changed_ids
            .into_iter()
            .map(|id| (id.as_ref().to_string(), ChangedFields::All))
            .collect();
        self.run(changes)
    }

    /// Analyze changes that carry their changed field sets.
    ///
    /// Repeated ids are merged; a field set of `All` wins.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEntityError`] for the first id (in sorted order) that
    /// is not a node of the graph.
    pub fn analyze_changes(&self, changes: &[Change]) -> Result<ImpactReport, UnknownEntityError> {
        let mut merged: BTreeMap<String, ChangedFields> = BTreeMap::new();
        for change in changes {
            let fields = match merged.remove(&change.id) {
                None => change.fields.clone(),
                Some(previous) => merge(previous, &change.fields),
            };
            merged.insert(change.id.clone(), fields);
        }
        self.run(merged)
    }

    fn run(
        &self,
        changes: BTreeMap<String, ChangedFields>,
    ) -> Result<ImpactReport, UnknownEntityError> {
        if changes.is_empty() {
            return Ok(ImpactReport::empty());
        }
        if let Some(unknown) = changes.keys().find(|id| !self.graph.contains(id)) {
            return Err(UnknownEntityError::new(unknown.as_str()));
        }

        tracing::debug!(
            changed = changes.len(),
            max_depth = ?self.options.max_depth,
            "starting impact analysis"
        );

        let graph = self.graph;
        let contexts: HashMap<&str, RuleContext<'_>> = changes
            .iter()
            .filter_map(|(id, fields)| match self.store.get(id) {
                Some(changed) => Some((
                    id.as_str(),
                    RuleContext {
                        changed,
                        changed_fields: fields,
                    },
                )),
                None => {
                    tracing::warn!(entity = %id, "changed entity missing from store; rules skipped");
                    None
                }
            })
            .collect();

        // `reached` fixes discovery order; `expanded` lets every changed id
        // walk its own branches through nodes another id reached first.
        let mut reached: HashSet<&str> = changes.keys().map(String::as_str).collect();
        let mut expanded: HashSet<(&str, &str)> =
            changes.keys().map(|id| (id.as_str(), id.as_str())).collect();
        let mut queue: VecDeque<(&str, &str, usize)> = changes
            .keys()
            .map(|id| (id.as_str(), id.as_str(), 0))
            .collect();
        let mut impacted: Vec<&str> = Vec::new();
        let mut issues: Vec<Issue> = Vec::new();
        let mut issue_keys: HashSet<(String, String, String)> = HashSet::new();

        while let Some((node, origin, depth)) = queue.pop_front() {
            if !self.options.expands(depth) {
                continue;
            }
            for neighbor in graph.neighbors(node) {
                if changes.contains_key(neighbor.id) {
                    continue;
                }
                tracing::trace!(edge = %neighbor.edge, origin, depth = depth + 1, "crossing edge");

                if let (Some(context), Some(entity)) =
                    (contexts.get(origin), self.store.get(neighbor.id))
                {
                    for issue in evaluate(context, entity, neighbor.edge, self.rules) {
                        let key = (
                            issue.rule_id.clone(),
                            issue.entity_id.clone(),
                            issue.changed_entity_id.clone(),
                        );
                        if issue_keys.insert(key) {
                            issues.push(issue);
                        }
                    }
                }

                if reached.insert(neighbor.id) {
                    impacted.push(neighbor.id);
                }
                if expanded.insert((origin, neighbor.id)) {
                    queue.push_back((neighbor.id, origin, depth + 1));
                }
            }
        }

        let stale: HashSet<&str> = issues
            .iter()
            .filter(|issue| self.options.staleness.marks(issue))
            .map(|issue| issue.entity_id.as_str())
            .collect();
        let stale_ids: Vec<String> = impacted
            .iter()
            .filter(|id| stale.contains(**id))
            .map(|id| (*id).to_string())
            .collect();
        let impacted_ids: Vec<String> = impacted.iter().map(|id| (*id).to_string()).collect();

        tracing::debug!(
            impacted = impacted_ids.len(),
            stale = stale_ids.len(),
            issues = issues.len(),
            "impact analysis finished"
        );

        Ok(ImpactReport {
            changed_ids: changes.keys().cloned().collect(),
            impacted_ids,
            total_stale: stale_ids.len(),
            stale_ids,
            issues,
        })
    }
}

fn merge(previous: ChangedFields, next: &ChangedFields) -> ChangedFields {
    match (previous, next) {
        (ChangedFields::Only(mut fields), ChangedFields::Only(more)) => {
            fields.extend(more.iter().cloned());
            ChangedFields::Only(fields)
        }
        _ => ChangedFields::All,
    }
}

/// Analyze `changed_ids` with explicit options.
///
/// # Errors
///
/// Returns [`UnknownEntityError`] if any id is not a node of `graph`.
pub fn analyze<S, I, T>(
    changed_ids: I,
    graph: &EntityGraph,
    rules: &RuleSet,
    store: &S,
    options: ImpactOptions,
) -> Result<ImpactReport, UnknownEntityError>
where
    S: EntityStore,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    ImpactAnalyzer::new(graph, rules, store)
        .with_options(options)
        .analyze(changed_ids)
}

/// Analyze field-level changes with explicit options.
///
/// # Errors
///
/// Returns [`UnknownEntityError`] if any id is not a node of `graph`.
pub fn analyze_changes<S: EntityStore>(
    changes: &[Change],
    graph: &EntityGraph,
    rules: &RuleSet,
    store: &S,
    options: ImpactOptions,
) -> Result<ImpactReport, UnknownEntityError> {
    ImpactAnalyzer::new(graph, rules, store)
        .with_options(options)
        .analyze_changes(changes)
}
