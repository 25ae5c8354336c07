use std::sync::Arc;

use effigy_core::{EntityError, EntityModel, EntityType};
use indexmap::IndexMap;

/// Name to entity lookup used to resolve relationship targets, including
/// targets declared after the entity that references them.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<EntityType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity, returning the one previously registered under its name.
    pub fn register(&mut self, entity: Arc<EntityType>) -> Option<Arc<EntityType>> {
        self.types.insert(entity.name().to_string(), entity)
    }

    pub fn with(mut self, entity: Arc<EntityType>) -> Self {
        self.register(entity);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&Arc<EntityType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<EntityType>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Comma separated entity names, `(none)` when empty.
    pub fn known_names(&self) -> String {
        if self.types.is_empty() {
            "(none)".to_string()
        } else {
            self.types.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }

    pub fn from_models(models: &[EntityModel]) -> Result<Self, EntityError> {
        let mut registry = Self::new();
        for model in models {
            registry.register(model.to_entity_type()?);
        }
        Ok(registry)
    }
}

impl FromIterator<Arc<EntityType>> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<EntityType>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entity in iter {
            registry.register(entity);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effigy_core::FieldType;

    fn entity(name: &str) -> Arc<EntityType> {
        EntityType::builder(name)
            .field("id", FieldType::int())
            .build()
            .unwrap()
    }

    #[test]
    fn resolves_by_name() {
        let registry = TypeRegistry::new().with(entity("Post")).with(entity("Tag"));
        assert_eq!(registry.resolve("Tag").unwrap().table_name(), "tags");
        assert!(registry.resolve("User").is_none());
        assert_eq!(registry.known_names(), "Post, Tag");
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register(entity("Post")).is_none());
        assert!(registry.register(entity("Post")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry_names() {
        assert_eq!(TypeRegistry::new().known_names(), "(none)");
    }

    #[test]
    fn from_models_builds_every_entity() {
        let models: Vec<EntityModel> = serde_json::from_str(
            r#"[
                {"name": "Post", "fields": {"id": "int", "tags": "list[\"Tag\"]"}},
                {"name": "Tag", "fields": {"id": "int"}}
            ]"#,
        )
        .unwrap();
        let registry = TypeRegistry::from_models(&models).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Tag"));
    }

    #[test]
    fn collects_from_iterator() {
        let registry: TypeRegistry = [entity("A"), entity("B")].into_iter().collect();
        assert_eq!(registry.len(), 2);
    }
}
