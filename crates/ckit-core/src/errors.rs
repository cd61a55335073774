//! Cross-cutting error types for ckit.
//!
//! Errors specific to graph building, rule loading, or analysis live in
//! their respective crates.

use thiserror::Error;

/// Errors that can be raised by the shared data model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A string did not name a known variant of an enum.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Two entities in one collection share an id.
    #[error("Duplicate entity id: {0}")]
    DuplicateId(String),
}
