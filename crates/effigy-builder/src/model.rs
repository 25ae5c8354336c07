use effigy_core::{EntityModel, RelationshipModelKind};

use crate::builder::DbBuilder;
use crate::error::BuilderError;

impl DbBuilder {
    /// Replays a declarative entity model onto the fluent API.
    ///
    /// The model's entity must already be registered with the builder's
    /// type registry (see [`crate::TypeRegistry::from_models`]).
    pub fn configure_model(&mut self, model: &EntityModel) -> Result<(), BuilderError> {
        let config = self.entity(&model.name)?;

        if let Some(key) = &model.key {
            let fields: Vec<&str> = key.fields.iter().map(String::as_str).collect();
            config.has_key(&fields, key.autoincrement)?;
        }

        for (field, prop) in &model.properties {
            let target = config.property(field)?;
            if prop.required {
                target.required();
            }
            if prop.unique {
                target.unique();
            }
            if let Some(max_len) = prop.max_len {
                target.max_len(max_len);
            }
            if let Some(default) = &prop.default {
                target.with_default(default.clone());
            }
            if let Some(server_default) = &prop.server_default {
                target.with_server_default(server_default.clone());
            }
            if prop.autoincrement {
                target.autoincrement();
            }
        }

        for index in &model.indexes {
            let fields: Vec<&str> = index.fields.iter().map(String::as_str).collect();
            config.has_index(&fields, index.unique, index.name.as_deref())?;
        }

        for rel in &model.relationships {
            let relationship = match rel.kind {
                RelationshipModelKind::HasOne => config.has_one(&rel.navigation)?,
                RelationshipModelKind::HasMany => config.has_many(&rel.navigation)?,
            };
            if let Some(fk) = &rel.foreign_key {
                relationship.with_foreign_key(fk)?;
            }
            if rel.many_to_many || rel.inverse.is_some() {
                relationship.with_many(rel.inverse.as_deref())?;
            }
            if let Some(backpopulates) = &rel.backpopulates {
                relationship.backpopulates(backpopulates)?;
            }
            if let Some(cascade) = &rel.cascade {
                relationship.cascade(cascade.clone());
            }
            if let Some(lazy) = &rel.lazy {
                relationship.with_lazy_loading(lazy.clone());
            }
        }

        tracing::debug!(entity = %model.name, "configured entity from model");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use effigy_core::{MappingRegistry, RelationshipKind};

    fn models() -> Vec<EntityModel> {
        serde_json::from_str(
            r#"[
                {
                    "name": "Post",
                    "fields": {"id": "int | None", "title": "str", "tags": "list[\"Tag\"]"},
                    "key": {"fields": ["id"], "autoincrement": true},
                    "properties": {"title": {"required": true, "max_len": 200}},
                    "relationships": [
                        {"navigation": "tags", "kind": "has_many", "inverse": "posts", "lazy": "selectin"}
                    ],
                    "indexes": [{"fields": ["title"]}]
                },
                {
                    "name": "Tag",
                    "fields": {"id": "int", "label": "str", "posts": "list[Post]"},
                    "key": {"fields": ["id"]},
                    "relationships": [
                        {"navigation": "posts", "kind": "has_many", "many_to_many": true, "backpopulates": "tags"}
                    ],
                    "indexes": [{"fields": ["label"], "unique": true, "name": "tag_label"}]
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn replays_models_onto_builder() {
        let models = models();
        let mut builder = DbBuilder::new(TypeRegistry::from_models(&models).unwrap());
        for model in &models {
            builder.configure_model(model).unwrap();
        }

        let mut mappings = MappingRegistry::new();
        let metadata = builder.finalize(&mut mappings).unwrap();

        assert_eq!(
            metadata.table_names().collect::<Vec<_>>(),
            vec!["posts", "tags", "posts_tags"]
        );
        let posts = metadata.table("posts").unwrap();
        assert!(posts.column("id").unwrap().auto_increment);
        assert_eq!(posts.column("title").unwrap().r#type.to_string(), "varchar(200)");
        assert_eq!(posts.indexes[0].name, "ix_posts_title");
        assert_eq!(metadata.table("tags").unwrap().indexes[0].name, "tag_label");

        let tags = mappings.mapper("Post").unwrap().relationship("tags").unwrap();
        assert_eq!(tags.kind, RelationshipKind::ManyToMany);
        assert_eq!(tags.secondary.as_deref(), Some("posts_tags"));
        assert_eq!(tags.back_populates.as_deref(), Some("posts"));
        assert_eq!(tags.lazy, "selectin");
    }

    #[test]
    fn unknown_model_entity_is_rejected() {
        let models = models();
        let mut builder = DbBuilder::new(TypeRegistry::new());
        let err = builder.configure_model(&models[0]).unwrap_err();
        assert!(matches!(err, BuilderError::UnknownEntity { .. }));
    }
}
