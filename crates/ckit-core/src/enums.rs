//! Entity types, relationship kinds, statuses, and severities for ckit.
//!
//! All enums serialize as kebab-case (`user-story`, `depends-on`). Parsing
//! through [`FromStr`] is more lenient and also accepts `snake_case` and the
//! compact directory names used by entity stores (`userstory`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Lowercase and map `_` to `-` so `depends_on` and `Depends-On` parse alike.
fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('_', "-")
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of artifact stored in the context repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Feature,
    UserStory,
    Spec,
    Task,
    Service,
    Package,
}

impl EntityType {
    pub const ALL: [Self; 6] = [
        Self::Feature,
        Self::UserStory,
        Self::Spec,
        Self::Task,
        Self::Service,
        Self::Package,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::UserStory => "user-story",
            Self::Spec => "spec",
            Self::Task => "task",
            Self::Service => "service",
            Self::Package => "package",
        }
    }

    /// Statuses an entity of this type may carry.
    ///
    /// Other statuses are tolerated by the engine but surface as gaps when
    /// a graph is inspected.
    #[must_use]
    pub const fn allowed_statuses(self) -> &'static [Status] {
        match self {
            Self::Feature | Self::UserStory => &[
                Status::Draft,
                Status::Proposed,
                Status::Planned,
                Status::InProgress,
                Status::Blocked,
                Status::Done,
                Status::Deprecated,
            ],
            Self::Spec => &[
                Status::Draft,
                Status::Proposed,
                Status::Active,
                Status::Deprecated,
            ],
            Self::Task => &[
                Status::Planned,
                Status::InProgress,
                Status::Blocked,
                Status::Done,
            ],
            Self::Service | Self::Package => &[
                Status::Draft,
                Status::Planned,
                Status::Active,
                Status::Deprecated,
            ],
        }
    }

    #[must_use]
    pub fn allows_status(self, status: Status) -> bool {
        self.allowed_statuses().contains(&status)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "feature" => Ok(Self::Feature),
            "user-story" | "userstory" => Ok(Self::UserStory),
            "spec" => Ok(Self::Spec),
            "task" => Ok(Self::Task),
            "service" => Ok(Self::Service),
            "package" => Ok(Self::Package),
            _ => Err(CoreError::UnknownVariant {
                kind: "entity type",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Kind of a directed relationship between two entities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    Implements,
    Specifies,
    Delivers,
    DependsOn,
    Consumes,
    Blocks,
    Uses,
    Provides,
    RelatesTo,
    DerivedFrom,
}

impl Relation {
    pub const ALL: [Self; 10] = [
        Self::Implements,
        Self::Specifies,
        Self::Delivers,
        Self::DependsOn,
        Self::Consumes,
        Self::Blocks,
        Self::Uses,
        Self::Provides,
        Self::RelatesTo,
        Self::DerivedFrom,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Implements => "implements",
            Self::Specifies => "specifies",
            Self::Delivers => "delivers",
            Self::DependsOn => "depends-on",
            Self::Consumes => "consumes",
            Self::Blocks => "blocks",
            Self::Uses => "uses",
            Self::Provides => "provides",
            Self::RelatesTo => "relates-to",
            Self::DerivedFrom => "derived-from",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "relationship kind",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an entity.
///
/// Which statuses are meaningful depends on the entity type, see
/// [`EntityType::allowed_statuses`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Draft,
    Proposed,
    Planned,
    InProgress,
    Blocked,
    Done,
    Active,
    Deprecated,
}

impl Status {
    pub const ALL: [Self; 8] = [
        Self::Draft,
        Self::Proposed,
        Self::Planned,
        Self::InProgress,
        Self::Blocked,
        Self::Done,
        Self::Active,
        Self::Deprecated,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Proposed => "proposed",
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Active => "active",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of an issue. Ordered from least to most severe.
///
/// ```text
/// info < warning < error < critical
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
