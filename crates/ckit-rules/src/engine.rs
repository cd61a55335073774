use ckit_core::{Entity, Issue};
use ckit_graph::{Direction, Edge};

use crate::changes::ChangedFields;
use crate::set::RuleSet;
use crate::template::Bindings;

static ALL_FIELDS: ChangedFields = ChangedFields::All;

/// The change a traversal branch started from.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub changed: &'a Entity,
    pub changed_fields: &'a ChangedFields,
}

impl<'a> RuleContext<'a> {
    /// Context treating every field of `changed` as changed.
    #[must_use]
    pub fn all_fields(changed: &'a Entity) -> Self {
        Self {
            changed,
            changed_fields: &ALL_FIELDS,
        }
    }
}

/// Evaluate the rule set for one crossed edge.
///
/// The crossing direction follows from which endpoint `neighbor` is: the
/// edge target means the traversal moved downstream, the edge source means
/// upstream. Candidate rules come from the edge's
/// `(source type, kind, target type)` signature; each one whose direction
/// fires and whose condition holds for the changed entity yields one issue,
/// in rule definition order.
///
/// Pure and total: an edge that does not touch `neighbor` yields nothing.
#[must_use]
pub fn evaluate(
    context: &RuleContext<'_>,
    neighbor: &Entity,
    edge: &Edge,
    rules: &RuleSet,
) -> Vec<Issue> {
    let crossing = if edge.target == neighbor.id {
        Direction::Outgoing
    } else if edge.source == neighbor.id {
        Direction::Incoming
    } else {
        return Vec::new();
    };

    rules
        .matching(edge.source_type, edge.relation, edge.target_type)
        .into_iter()
        .filter(|rule| rule.direction.fires_on(crossing))
        .filter(|rule| {
            rule.condition
                .as_ref()
                .is_none_or(|condition| condition.is_satisfied(context.changed, context.changed_fields))
        })
        .map(|rule| {
            let bindings = Bindings {
                changed: context.changed,
                neighbor,
                relation: edge.relation,
                condition_field: rule.condition.as_ref().map(|c| c.field.as_str()),
            };
            Issue {
                rule_id: rule.id.clone(),
                entity_id: neighbor.id.clone(),
                changed_entity_id: context.changed.id.clone(),
                reason: rule.template.render(&bindings),
                severity: rule.severity,
            }
        })
        .collect()
}
