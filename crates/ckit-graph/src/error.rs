//! Graph build error types.

use thiserror::Error;

/// Errors from building an [`EntityGraph`](crate::EntityGraph).
///
/// Inconsistent relationships are never errors; they are recorded as
/// warnings on the graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphBuildError {
    /// Two entities in the input collection share an id.
    #[error("Duplicate entity id: {id}")]
    DuplicateId { id: String },
}
