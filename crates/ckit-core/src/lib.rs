//! # ckit-core
//!
//! Shared data model for the ckit impact analysis engine.
//!
//! This crate provides the types every other ckit crate speaks:
//! - Entity types, relationship kinds, statuses, and issue severities
//! - The borrowed-only [`EntityStore`](entity::EntityStore) query interface
//!   and an in-memory [`EntityCatalog`](entity::EntityCatalog)
//! - Issues and impact reports, serializable with stable field names
//! - Cross-cutting error types

pub mod entity;
pub mod enums;
pub mod errors;
pub mod report;

pub use entity::{Entity, EntityCatalog, EntityStore};
pub use enums::{EntityType, Relation, Severity, Status};
pub use errors::CoreError;
pub use report::{ImpactReport, Issue};
