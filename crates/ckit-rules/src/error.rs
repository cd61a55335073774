//! Rule loading error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading rule definitions into a [`RuleSet`](crate::RuleSet).
#[derive(Debug, Error)]
pub enum RuleParseError {
    /// A definition names an unknown entity type or relationship kind.
    #[error("Rule '{rule}' has an unknown pattern: {reason}")]
    UnknownPattern { rule: String, reason: String },

    /// A field condition is missing parts or uses an unsupported predicate.
    #[error("Rule '{rule}' has a malformed condition: {reason}")]
    MalformedCondition { rule: String, reason: String },

    /// A definition has an empty id.
    #[error("Rule definition #{index} has no id")]
    MissingId { index: usize },

    /// Two definitions share an id.
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// Reading a rule file failed.
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rule document could not be decoded.
    #[error("Failed to decode rules from {origin}: {reason}")]
    Decode { origin: String, reason: String },

    /// The rule file extension is neither `.toml` nor `.json`.
    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(PathBuf),
}
