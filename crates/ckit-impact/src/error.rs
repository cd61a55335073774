use thiserror::Error;

/// Analysis was requested for an id that is not a node of the graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown entity: {id}")]
pub struct UnknownEntityError {
    pub id: String,
}

impl UnknownEntityError {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
