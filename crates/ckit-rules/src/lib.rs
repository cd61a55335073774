//! # ckit-rules
//!
//! Declarative consistency rules for ckit impact analysis.
//!
//! - [`RuleDefinition`] is the structured record rules are authored in
//!   (TOML or JSON files, or built in code)
//! - [`RuleSet::load`] validates definitions into immutable [`Rule`]s with an
//!   indexed `(source type, relationship, target type)` lookup
//! - [`evaluate`] applies a rule set to one crossed edge and yields issues

mod changes;
mod definition;
mod engine;
mod error;
mod rule;
mod set;
mod template;

pub use changes::ChangedFields;
pub use definition::{ConditionDefinition, RuleDefinition, RuleFile};
pub use engine::{RuleContext, evaluate};
pub use error::RuleParseError;
pub use rule::{FieldCondition, Pattern, Predicate, Rule, RuleDirection};
pub use set::RuleSet;
pub use template::Template;
