use std::sync::Arc;

use effigy_core::{EntityType, MappingRegistry, MetaData, RelationshipKind};
use indexmap::{IndexMap, IndexSet};
use tracing::instrument;

use crate::error::BuilderError;
use crate::index::IndexConfiguration;
use crate::property::PropertyConfiguration;
use crate::registry::TypeRegistry;
use crate::relationship::RelationshipConfiguration;
use crate::table::create_table;

/// Fluent schema builder.
///
/// Entities are configured through [`DbBuilder::entity`]; [`DbBuilder::finalize`]
/// then synthesizes every table, then every index, then every relationship,
/// each phase completing for all entities before the next begins.
#[derive(Debug)]
pub struct DbBuilder {
    registry: Arc<TypeRegistry>,
    configurations: IndexMap<String, EntityConfiguration>,
}

impl DbBuilder {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            configurations: IndexMap::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Configuration for the named entity, created on first use.
    pub fn entity(&mut self, name: &str) -> Result<&mut EntityConfiguration, BuilderError> {
        if !self.configurations.contains_key(name) {
            let entity = self.registry.resolve(name).cloned().ok_or_else(|| {
                BuilderError::UnknownEntity {
                    entity: name.to_string(),
                    known: self.registry.known_names(),
                }
            })?;
            let config = EntityConfiguration::new(entity, self.registry.clone());
            self.configurations.insert(name.to_string(), config);
        }
        self.configurations
            .get_mut(name)
            .ok_or_else(|| BuilderError::UnknownEntity {
                entity: name.to_string(),
                known: self.registry.known_names(),
            })
    }

    pub fn is_configured(&self, name: &str) -> bool {
        self.configurations.contains_key(name)
    }

    pub fn configurations(&self) -> impl Iterator<Item = &EntityConfiguration> {
        self.configurations.values()
    }

    /// Synthesizes the schema and registers mappings.
    ///
    /// Entities already present in `mappings` keep their existing mapping, so
    /// the same registry can back several builder runs.
    #[instrument(skip_all, fields(entities = self.configurations.len()))]
    pub fn finalize(mut self, mappings: &mut MappingRegistry) -> Result<MetaData, BuilderError> {
        let mut metadata = MetaData::new();

        for config in self.configurations.values() {
            config.create_table(&mut metadata, mappings)?;
        }
        for config in self.configurations.values() {
            config.create_indexes(&mut metadata)?;
        }

        let configured: IndexSet<String> = self.configurations.keys().cloned().collect();
        for config in self.configurations.values_mut() {
            config.create_relationships(&configured, &mut metadata, mappings)?;
        }

        tracing::info!(
            entities = self.configurations.len(),
            tables = metadata.len(),
            "schema finalized"
        );
        Ok(metadata)
    }
}

/// Builder-side state for one entity.
#[derive(Debug)]
pub struct EntityConfiguration {
    entity: Arc<EntityType>,
    registry: Arc<TypeRegistry>,
    keys: Vec<String>,
    properties: IndexMap<String, PropertyConfiguration>,
    relationships: Vec<RelationshipConfiguration>,
    indexes: Vec<IndexConfiguration>,
}

impl EntityConfiguration {
    fn new(entity: Arc<EntityType>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            entity,
            registry,
            keys: Vec::new(),
            properties: IndexMap::new(),
            relationships: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn entity(&self) -> &Arc<EntityType> {
        &self.entity
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn relationships(&self) -> &[RelationshipConfiguration] {
        &self.relationships
    }

    pub fn indexes(&self) -> &[IndexConfiguration] {
        &self.indexes
    }

    pub fn property_configuration(&self, field: &str) -> Option<&PropertyConfiguration> {
        self.properties.get(field)
    }

    /// Overrides for `field`, created on first use.
    pub fn property(&mut self, field: &str) -> Result<&mut PropertyConfiguration, BuilderError> {
        self.entity.require_field(field)?;
        Ok(self
            .properties
            .entry(field.to_string())
            .or_insert_with(|| PropertyConfiguration::new(field)))
    }

    /// Marks `fields` as the primary key. Autoincrement is only accepted on a
    /// single-field key.
    pub fn has_key(&mut self, fields: &[&str], autoincrement: bool) -> Result<&mut Self, BuilderError> {
        if fields.is_empty() {
            return Err(BuilderError::EmptyKey {
                entity: self.entity.name().to_string(),
            });
        }
        if autoincrement && fields.len() > 1 {
            return Err(BuilderError::CompositeAutoincrement {
                entity: self.entity.name().to_string(),
                fields: format!("({})", fields.join(", ")),
            });
        }
        for field in fields {
            self.entity.require_field(field)?;
        }

        for field in fields {
            let prop = self.property(field)?;
            if autoincrement {
                prop.autoincrement();
            }
            if !self.keys.iter().any(|k| k == field) {
                self.keys.push(field.to_string());
            }
        }
        Ok(self)
    }

    /// Declares a many-to-one navigation.
    pub fn has_one(&mut self, navigation: &str) -> Result<&mut RelationshipConfiguration, BuilderError> {
        self.add_relationship(navigation, RelationshipKind::ManyToOne)
    }

    /// Declares a one-to-many navigation; chain `with_many` for many-to-many.
    pub fn has_many(&mut self, navigation: &str) -> Result<&mut RelationshipConfiguration, BuilderError> {
        self.add_relationship(navigation, RelationshipKind::OneToMany)
    }

    fn add_relationship(
        &mut self,
        navigation: &str,
        kind: RelationshipKind,
    ) -> Result<&mut RelationshipConfiguration, BuilderError> {
        self.entity.require_field(navigation)?;
        let index = self.relationships.len();
        self.relationships.push(RelationshipConfiguration::new(
            navigation,
            kind,
            self.entity.clone(),
            self.registry.clone(),
        ));
        Ok(&mut self.relationships[index])
    }

    pub fn has_index(
        &mut self,
        fields: &[&str],
        unique: bool,
        name: Option<&str>,
    ) -> Result<&mut Self, BuilderError> {
        if fields.is_empty() {
            return Err(BuilderError::EmptyIndex {
                entity: self.entity.name().to_string(),
            });
        }
        for field in fields {
            self.entity.require_field(field)?;
        }
        self.indexes.push(IndexConfiguration::new(
            fields.iter().map(|f| f.to_string()).collect(),
            unique,
            name.map(str::to_string),
        ));
        Ok(self)
    }

    fn create_table(
        &self,
        metadata: &mut MetaData,
        mappings: &mut MappingRegistry,
    ) -> Result<(), BuilderError> {
        let table = create_table(&self.entity, &self.properties, &self.keys)?;
        tracing::debug!(
            entity = self.entity.name(),
            table = %table.name,
            columns = table.columns.len(),
            "created table"
        );
        let table = metadata.add_table(table)?;

        if !mappings.map_imperatively(self.entity.clone(), table) {
            tracing::debug!(entity = self.entity.name(), "entity already mapped, skipping");
            return Ok(());
        }
        for (field, prop) in &self.properties {
            if !prop.validators().is_empty() {
                mappings.set_validators(self.entity.name(), field, prop.validators().to_vec())?;
            }
        }
        Ok(())
    }

    fn create_indexes(&self, metadata: &mut MetaData) -> Result<(), BuilderError> {
        let table_name = self.entity.table_name();
        let table = metadata.require_table_mut(table_name)?;
        for config in &self.indexes {
            let index = config.create_index(table, table_name)?;
            tracing::debug!(table = table_name, index = %index.name, "created index");
            table.indexes.push(index);
        }
        Ok(())
    }

    fn create_relationships(
        &mut self,
        configured: &IndexSet<String>,
        metadata: &mut MetaData,
        mappings: &mut MappingRegistry,
    ) -> Result<(), BuilderError> {
        for relationship in &mut self.relationships {
            relationship.validate(configured, metadata)?;
            relationship.apply(metadata, mappings)?;
        }
        Ok(())
    }
}
