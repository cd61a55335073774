//! # ckit-graph
//!
//! Directed entity graph for ckit impact analysis.
//!
//! [`build`] turns an entity collection into an immutable [`EntityGraph`]:
//! - Relationship fields are read through a fixed per-type table
//!   ([`relationship_fields`]) and normalized to one canonical direction
//! - Forward and reverse adjacency indices keyed by relationship kind
//! - Dangling, self-referencing, or malformed declarations become
//!   [`GraphWarning`]s instead of errors
//!
//! [`inspect`] summarizes a built graph (counts, connectivity, gaps).

mod builder;
mod error;
mod graph;
mod relationship;
mod summary;

pub use builder::build;
pub use error::GraphBuildError;
pub use graph::{Direction, Edge, EntityGraph, GraphWarning, Neighbor};
pub use relationship::{Orientation, RelationshipField, relationship_fields};
pub use summary::{GraphSummary, inspect};
