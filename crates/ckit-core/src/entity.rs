use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::{EntityType, Status};
use crate::errors::CoreError;

/// A typed artifact record as supplied by the entity store.
///
/// `fields` holds everything else the record declares, relationship fields
/// included. The engine treats the values as opaque unless a relationship
/// table entry or a rule names the field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub status: Status,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Entity {
    #[must_use]
    pub fn new(id: impl Into<String>, entity_type: EntityType, status: Status) -> Self {
        Self {
            id: id.into(),
            entity_type,
            status,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Render a field as display text.
    ///
    /// Strings render without quotes, `null` and absent fields render as
    /// `None`, anything else renders as compact JSON.
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Read-only query interface over the entity collection.
///
/// The engine only ever borrows entities for the duration of one call.
pub trait EntityStore {
    /// Look up one entity by id.
    fn get(&self, id: &str) -> Option<&Entity>;

    /// All entities, in a stable order.
    fn entities(&self) -> impl Iterator<Item = &Entity>;

    fn len(&self) -> usize {
        self.entities().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory entity store keyed by id, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: BTreeMap<String, Entity>,
}

impl EntityCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateId`] for the first repeated id.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Result<Self, CoreError> {
        let mut catalog = Self::new();
        for entity in entities {
            catalog.insert(entity)?;
        }
        Ok(catalog)
    }

    /// Add one entity.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, entity: Entity) -> Result<(), CoreError> {
        if self.entities.contains_key(&entity.id) {
            return Err(CoreError::DuplicateId(entity.id));
        }
        self.entities.insert(entity.id.clone(), entity);
        Ok(())
    }
}

impl EntityStore for EntityCatalog {
    fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_store_record() {
        let entity: Entity = serde_json::from_value(json!({
            "id": "FEAT-001",
            "type": "feature",
            "status": "in-progress",
            "fields": {
                "title": "Impact analysis",
                "userStories": ["US-001", "US-002"]
            }
        }))
        .unwrap();

        assert_eq!(entity.id, "FEAT-001");
        assert_eq!(entity.entity_type, EntityType::Feature);
        assert_eq!(entity.status, Status::InProgress);
        assert_eq!(entity.field_text("title").as_deref(), Some("Impact analysis"));
        assert_eq!(
            entity.field_text("userStories").as_deref(),
            Some(r#"["US-001","US-002"]"#)
        );
    }

    #[test]
    fn missing_and_null_fields_have_no_text() {
        let entity = Entity::new("T-1", EntityType::Task, Status::Planned).with_field("owner", Value::Null);
        assert_eq!(entity.field_text("owner"), None);
        assert_eq!(entity.field_text("priority"), None);
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let result = EntityCatalog::from_entities([
            Entity::new("PKG-1", EntityType::Package, Status::Active),
            Entity::new("PKG-1", EntityType::Package, Status::Draft),
        ]);
        assert_eq!(result.unwrap_err(), CoreError::DuplicateId("PKG-1".into()));
    }

    #[test]
    fn catalog_iterates_in_id_order() {
        let catalog = EntityCatalog::from_entities([
            Entity::new("SVC-2", EntityType::Service, Status::Active),
            Entity::new("FEAT-1", EntityType::Feature, Status::Draft),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog.entities().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["FEAT-1", "SVC-2"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("SVC-2").is_some());
        assert!(catalog.get("SVC-9").is_none());
    }
}
