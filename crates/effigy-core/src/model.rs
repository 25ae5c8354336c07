//! Declarative entity files.
//!
//! An [`EntityModel`] is the serialized form of one entity declaration plus
//! the fluent configuration applied to it, so that schemas can be described
//! in JSON or YAML and replayed onto a builder.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::EntityError;
use crate::field_type::FieldType;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Field name to type annotation, in declaration order.
    pub fields: IndexMap<String, FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyModel>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KeyModel {
    pub fields: Vec<String>,
    #[serde(default)]
    pub autoincrement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PropertyModel {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_default: Option<String>,
    #[serde(default)]
    pub autoincrement: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipModelKind {
    HasOne,
    HasMany,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RelationshipModel {
    pub navigation: String,
    pub kind: RelationshipModelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backpopulates: Option<String>,
    /// Promotes a `has_many` to many-to-many.
    #[serde(default)]
    pub many_to_many: bool,
    /// Inverse navigation on the related entity, many-to-many only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IndexModel {
    pub fields: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityModel {
    pub fn to_entity_type(&self) -> Result<Arc<EntityType>, EntityError> {
        let mut builder = EntityType::builder(self.name.clone());
        if let Some(table_name) = &self.table_name {
            builder = builder.table_name(table_name.clone());
        }
        for (name, ty) in &self.fields {
            builder = builder.field(name.clone(), ty.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_YAML: &str = r#"
name: Post
fields:
  id: int
  title: str
  author_id: int | None
  tags: list["Tag"]
key:
  fields: [id]
  autoincrement: false
properties:
  title:
    required: true
    max_len: 120
relationships:
  - navigation: tags
    kind: has_many
    many_to_many: true
indexes:
  - fields: [title]
    unique: true
"#;

    #[test]
    fn parses_yaml_model() {
        let model: EntityModel = serde_yaml::from_str(POST_YAML).unwrap();
        assert_eq!(model.name, "Post");
        assert_eq!(model.key.as_ref().unwrap().fields, vec!["id"]);
        assert_eq!(model.properties["title"].max_len, Some(120));
        assert!(model.properties["title"].required);
        assert_eq!(model.relationships[0].kind, RelationshipModelKind::HasMany);
        assert!(model.relationships[0].many_to_many);
        assert!(model.indexes[0].unique);
        assert_eq!(
            model.fields["tags"],
            FieldType::list_of(FieldType::entity("Tag"))
        );
    }

    #[test]
    fn to_entity_type_keeps_field_order() {
        let model: EntityModel = serde_yaml::from_str(POST_YAML).unwrap();
        let entity = model.to_entity_type().unwrap();
        assert_eq!(entity.table_name(), "posts");
        assert_eq!(
            entity.field_names().collect::<Vec<_>>(),
            vec!["id", "title", "author_id", "tags"]
        );
    }

    #[test]
    fn parses_json_model_with_defaults() {
        let model: EntityModel = serde_json::from_str(
            r#"{"name": "Tag", "table_name": "labels", "fields": {"id": "int", "name": "str"}}"#,
        )
        .unwrap();
        assert!(model.key.is_none());
        assert!(model.relationships.is_empty());
        assert_eq!(model.to_entity_type().unwrap().table_name(), "labels");
    }

    #[test]
    fn rejects_bad_annotation() {
        let result: Result<EntityModel, _> =
            serde_json::from_str(r#"{"name": "Tag", "fields": {"id": "list["}}"#);
        assert!(result.is_err());
    }
}
