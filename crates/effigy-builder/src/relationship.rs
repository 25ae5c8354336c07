use std::sync::Arc;

use effigy_core::{
    ColumnDef, DEFAULT_CASCADE, DEFAULT_LAZY, EntityType, FieldType, ForeignKeyDef,
    MappingRegistry, MetaData, RelationshipDescriptor, RelationshipKind, TableDef,
};
use effigy_naming::{build_association_column_name, build_association_table_name};
use indexmap::IndexSet;

use crate::error::BuilderError;
use crate::registry::TypeRegistry;

/// Configuration of one navigation property.
///
/// Created by `has_one` (many-to-one) or `has_many` (one-to-many); `with_many`
/// promotes a one-to-many to many-to-many. The related entity is read from the
/// navigation field's declared type and resolved through the [`TypeRegistry`]
/// the first time it is needed.
#[derive(Debug, Clone)]
pub struct RelationshipConfiguration {
    navigation: String,
    kind: RelationshipKind,
    entity: Arc<EntityType>,
    registry: Arc<TypeRegistry>,
    related: Option<Arc<EntityType>>,
    foreign_key: Option<String>,
    back_populates: Option<String>,
    cascade: String,
    lazy: String,
}

impl RelationshipConfiguration {
    pub fn new(
        navigation: impl Into<String>,
        kind: RelationshipKind,
        entity: Arc<EntityType>,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            navigation: navigation.into(),
            kind,
            entity,
            registry,
            related: None,
            foreign_key: None,
            back_populates: None,
            cascade: DEFAULT_CASCADE.to_string(),
            lazy: DEFAULT_LAZY.to_string(),
        }
    }

    pub fn navigation(&self) -> &str {
        &self.navigation
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn foreign_key(&self) -> Option<&str> {
        self.foreign_key.as_deref()
    }

    pub fn back_populates(&self) -> Option<&str> {
        self.back_populates.as_deref()
    }

    pub fn cascade_policy(&self) -> &str {
        &self.cascade
    }

    pub fn lazy_loading(&self) -> &str {
        &self.lazy
    }

    /// Names the foreign-key field. It lives on the "many" side: the related
    /// entity for one-to-many, the declaring entity for many-to-one.
    pub fn with_foreign_key(&mut self, field: &str) -> Result<&mut Self, BuilderError> {
        if self.kind == RelationshipKind::ManyToMany {
            return Err(BuilderError::ForeignKeyOnManyToMany {
                entity: self.entity.name().to_string(),
                navigation: self.navigation.clone(),
            });
        }
        let related = self.related_entity()?;
        let owner = self.foreign_key_owner(&related);
        owner.require_field(field)?;
        self.foreign_key = Some(field.to_string());
        Ok(self)
    }

    /// Names the inverse navigation on the related entity.
    pub fn backpopulates(&mut self, navigation: &str) -> Result<&mut Self, BuilderError> {
        let related = self.related_entity()?;
        related.require_field(navigation)?;
        self.back_populates = Some(navigation.to_string());
        Ok(self)
    }

    /// Turns a one-to-many into a many-to-many joined through an association
    /// table, optionally naming the inverse navigation on the related entity.
    pub fn with_many(&mut self, inverse: Option<&str>) -> Result<&mut Self, BuilderError> {
        if self.kind != RelationshipKind::OneToMany {
            return Err(BuilderError::WithManyOnNonOneToMany {
                entity: self.entity.name().to_string(),
                navigation: self.navigation.clone(),
                kind: self.kind,
            });
        }
        self.kind = RelationshipKind::ManyToMany;

        if let Some(inverse) = inverse {
            let related = self.related_entity()?;
            related.require_field(inverse)?;
            self.back_populates = Some(inverse.to_string());
        }
        Ok(self)
    }

    pub fn cascade(&mut self, policy: impl Into<String>) -> &mut Self {
        self.cascade = policy.into();
        self
    }

    pub fn with_lazy_loading(&mut self, strategy: impl Into<String>) -> &mut Self {
        self.lazy = strategy.into();
        self
    }

    /// The related entity, resolved once and remembered.
    pub fn related_entity(&mut self) -> Result<Arc<EntityType>, BuilderError> {
        if let Some(related) = &self.related {
            return Ok(related.clone());
        }
        let related = self.determine_related_entity()?;
        self.related = Some(related.clone());
        Ok(related)
    }

    fn determine_related_entity(&self) -> Result<Arc<EntityType>, BuilderError> {
        let decl = self.entity.require_field(&self.navigation)?;
        let declared = decl.ty.optional_inner().unwrap_or(&decl.ty);
        // Mappings have no single element type and never name a related entity
        let target = if declared.is_collection() {
            declared.element_type()
        } else {
            Some(declared)
        };

        let Some(FieldType::Entity(name)) = target else {
            return Err(BuilderError::InvalidNavigation {
                entity: self.entity.name().to_string(),
                navigation: self.navigation.clone(),
                ty: decl.ty.to_string(),
            });
        };

        self.registry
            .resolve(name)
            .cloned()
            .ok_or_else(|| BuilderError::UnresolvedReference {
                entity: self.entity.name().to_string(),
                navigation: self.navigation.clone(),
                target: name.clone(),
                known: self.registry.known_names(),
            })
    }

    fn foreign_key_owner<'a>(&'a self, related: &'a Arc<EntityType>) -> &'a Arc<EntityType> {
        match self.kind {
            RelationshipKind::OneToMany => related,
            _ => &self.entity,
        }
    }

    /// Checks the relationship against the finished tables: the related entity
    /// must be configured in the same builder, and an explicit foreign key must
    /// be a column of its owning table.
    pub fn validate(
        &mut self,
        configured: &IndexSet<String>,
        metadata: &MetaData,
    ) -> Result<(), BuilderError> {
        let related = self.related_entity()?;
        if !configured.contains(related.name()) {
            return Err(BuilderError::RelatedNotConfigured {
                entity: self.entity.name().to_string(),
                navigation: self.navigation.clone(),
                related: related.name().to_string(),
            });
        }

        if self.kind == RelationshipKind::ManyToMany {
            return Ok(());
        }

        if let Some(fk) = &self.foreign_key {
            let owner = self.foreign_key_owner(&related);
            let table = metadata.require_table(owner.table_name())?;
            if !table.has_column(fk) {
                return Err(BuilderError::ForeignKeyNotFound {
                    entity: self.entity.name().to_string(),
                    navigation: self.navigation.clone(),
                    column: fk.clone(),
                    owner: owner.name().to_string(),
                    available: table.column_names().collect::<Vec<_>>().join(", "),
                });
            }
        }
        Ok(())
    }

    /// Creates the association table for a many-to-many relationship, or
    /// returns the name of the one already registered for the same pair.
    pub fn create_association_table(
        &mut self,
        metadata: &mut MetaData,
    ) -> Result<String, BuilderError> {
        let related = self.related_entity()?;
        let current_table = self.entity.table_name();
        let related_table = related.table_name();
        let name = build_association_table_name(current_table, related_table);

        if let Some(existing) = metadata.table(&name) {
            if !existing.is_association() {
                return Err(BuilderError::AssociationNameTaken {
                    table: name,
                    entity: self.entity.name().to_string(),
                    navigation: self.navigation.clone(),
                    owner: existing.entity.clone().unwrap_or_default(),
                });
            }
            tracing::debug!(table = %name, navigation = %self.navigation, "reusing association table");
            return Ok(name);
        }

        let current_pk = first_primary_key(metadata.require_table(current_table)?);
        let related_pk = first_primary_key(metadata.require_table(related_table)?);
        let (Some(current_pk), Some(related_pk)) = (current_pk, related_pk) else {
            return Err(BuilderError::AssociationWithoutKey {
                table: name,
                left: self.entity.name().to_string(),
                right: related.name().to_string(),
            });
        };

        let mut columns = Vec::with_capacity(2);
        let mut foreign_keys = Vec::with_capacity(2);
        // A self-referencing pair would repeat `{table}_{pk}`; the related
        // side is named after the navigation instead.
        let related_prefix = if current_table == related_table {
            self.navigation.as_str()
        } else {
            related_table
        };
        for (table, prefix, pk) in [
            (current_table, current_table, &current_pk),
            (related_table, related_prefix, &related_pk),
        ] {
            let column_name = build_association_column_name(prefix, &pk.name);
            let mut column = ColumnDef::new(column_name.clone(), pk.r#type.clone());
            column.primary_key = true;
            columns.push(column);
            foreign_keys.push(ForeignKeyDef::single(&name, &column_name, table, &pk.name));
        }

        let mut table = TableDef::new(name.clone(), None, columns);
        table.foreign_keys = foreign_keys;
        metadata.add_table(table)?;
        tracing::debug!(
            table = %name,
            left = current_table,
            right = related_table,
            "created association table"
        );
        Ok(name)
    }

    /// Attaches the relationship to the declaring entity's mapper.
    pub fn apply(
        &mut self,
        metadata: &mut MetaData,
        mappings: &mut MappingRegistry,
    ) -> Result<(), BuilderError> {
        let related = self.related_entity()?;
        let mut descriptor = RelationshipDescriptor {
            navigation: self.navigation.clone(),
            kind: self.kind,
            target: related.name().to_string(),
            foreign_keys: Vec::new(),
            secondary: None,
            back_populates: self.back_populates.clone(),
            cascade: self.cascade.clone(),
            lazy: self.lazy.clone(),
        };

        if self.kind == RelationshipKind::ManyToMany {
            descriptor.secondary = Some(self.create_association_table(metadata)?);
        } else if let Some(fk) = self.foreign_key.clone() {
            self.record_foreign_key(&related, &fk, metadata)?;
            descriptor.foreign_keys = vec![fk];
        }

        tracing::debug!(
            entity = self.entity.name(),
            navigation = %self.navigation,
            kind = %self.kind,
            target = related.name(),
            "applied relationship"
        );
        mappings.set_relationship(self.entity.name(), descriptor)?;
        Ok(())
    }

    /// Adds the constraint for an explicit foreign key to the owning table.
    /// Skipped when the referenced side has no single-column primary key.
    fn record_foreign_key(
        &self,
        related: &Arc<EntityType>,
        column: &str,
        metadata: &mut MetaData,
    ) -> Result<(), BuilderError> {
        let (owner, referenced) = match self.kind {
            RelationshipKind::OneToMany => (related, &self.entity),
            _ => (&self.entity, related),
        };

        let referenced_table = metadata.require_table(referenced.table_name())?;
        let pks: Vec<String> = referenced_table
            .primary_key_columns()
            .map(|c| c.name.clone())
            .collect();
        let [pk] = pks.as_slice() else {
            tracing::debug!(
                table = referenced.table_name(),
                "skipping foreign key constraint: no single-column primary key"
            );
            return Ok(());
        };

        let fk = ForeignKeyDef::single(owner.table_name(), column, &referenced_table.name, pk);
        metadata
            .require_table_mut(owner.table_name())?
            .add_foreign_key(fk);
        Ok(())
    }
}

fn first_primary_key(table: &TableDef) -> Option<ColumnDef> {
    table.primary_key_columns().next().cloned()
}
