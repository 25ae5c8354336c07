use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::SchemaError;
use crate::schema::{ColumnName, TableDef, TableName};
use crate::value::Value;

/// Cascade policy applied when a relationship does not configure one.
pub const DEFAULT_CASCADE: &str = "save-update, merge";

/// Lazy-loading strategy applied when a relationship does not configure one.
pub const DEFAULT_LAZY: &str = "select";

/// Predicate registered through `validate_with`; returns whether a value is acceptable.
pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::OneToMany => "one-to-many",
            RelationshipKind::ManyToOne => "many-to-one",
            RelationshipKind::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigable association attached to a mapped entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RelationshipDescriptor {
    pub navigation: String,
    pub kind: RelationshipKind,
    /// Name of the related entity.
    pub target: String,
    /// Foreign-key columns joining the two sides; empty when a secondary table is used
    /// or when the join is left for the engine to infer.
    #[serde(default)]
    pub foreign_keys: Vec<ColumnName>,
    /// Association table for many-to-many relationships.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<TableName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_populates: Option<String>,
    pub cascade: String,
    pub lazy: String,
}

/// Mapping of one entity onto its table.
#[derive(Clone)]
pub struct Mapper {
    entity: Arc<EntityType>,
    table: TableName,
    relationships: IndexMap<String, RelationshipDescriptor>,
    validators: IndexMap<String, Vec<Validator>>,
}

impl Mapper {
    fn new(entity: Arc<EntityType>, table: TableName) -> Self {
        Self {
            entity,
            table,
            relationships: IndexMap::new(),
            validators: IndexMap::new(),
        }
    }

    pub fn entity(&self) -> &Arc<EntityType> {
        &self.entity
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipDescriptor> {
        self.relationships.values()
    }

    pub fn relationship(&self, navigation: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.get(navigation)
    }

    /// Runs every predicate registered for `field`. Fields without
    /// predicates accept any value.
    pub fn validate(&self, field: &str, value: &Value) -> bool {
        self.validators
            .get(field)
            .is_none_or(|validators| validators.iter().all(|check| check(value)))
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validators: IndexMap<&str, usize> = self
            .validators
            .iter()
            .map(|(field, v)| (field.as_str(), v.len()))
            .collect();
        f.debug_struct("Mapper")
            .field("entity", &self.entity.name())
            .field("table", &self.table)
            .field("relationships", &self.relationships)
            .field("validators", &validators)
            .finish()
    }
}

/// Registry of mapped entities, keyed by entity name.
///
/// A registry outlives any single builder run: mapping the same entity twice
/// is a no-op so that a context can be constructed repeatedly against one
/// registry.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    mappers: IndexMap<String, Mapper>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `entity` onto `table`. Returns `false` without touching the
    /// existing mapping when the entity is already mapped.
    pub fn map_imperatively(&mut self, entity: Arc<EntityType>, table: &TableDef) -> bool {
        if self.mappers.contains_key(entity.name()) {
            return false;
        }
        let name = entity.name().to_string();
        self.mappers
            .insert(name, Mapper::new(entity, table.name.clone()));
        true
    }

    pub fn is_mapped(&self, entity: &str) -> bool {
        self.mappers.contains_key(entity)
    }

    pub fn mapper(&self, entity: &str) -> Option<&Mapper> {
        self.mappers.get(entity)
    }

    pub fn require_mapper(&self, entity: &str) -> Result<&Mapper, SchemaError> {
        self.mapper(entity)
            .ok_or_else(|| SchemaError::EntityNotMapped(entity.to_string()))
    }

    pub fn mappers(&self) -> impl Iterator<Item = &Mapper> {
        self.mappers.values()
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Attaches a relationship, replacing an earlier one on the same navigation.
    pub fn set_relationship(
        &mut self,
        entity: &str,
        descriptor: RelationshipDescriptor,
    ) -> Result<(), SchemaError> {
        let mapper = self
            .mappers
            .get_mut(entity)
            .ok_or_else(|| SchemaError::EntityNotMapped(entity.to_string()))?;
        mapper
            .relationships
            .insert(descriptor.navigation.clone(), descriptor);
        Ok(())
    }

    pub fn set_validators(
        &mut self,
        entity: &str,
        field: &str,
        validators: Vec<Validator>,
    ) -> Result<(), SchemaError> {
        let mapper = self
            .mappers
            .get_mut(entity)
            .ok_or_else(|| SchemaError::EntityNotMapped(entity.to_string()))?;
        mapper.validators.insert(field.to_string(), validators);
        Ok(())
    }
}
