pub mod entity;
pub mod error;
pub mod field_type;
pub mod mapping;
pub mod model;
pub mod schema;
pub mod value;

pub use entity::{EntityType, EntityTypeBuilder, FieldDecl};
pub use error::{EntityError, FieldTypeParseError, SchemaError};
pub use field_type::{CollectionKind, FieldType, ScalarType};
pub use mapping::{
    Mapper, MappingRegistry, RelationshipDescriptor, RelationshipKind, Validator,
    DEFAULT_CASCADE, DEFAULT_LAZY,
};
pub use model::{EntityModel, IndexModel, KeyModel, PropertyModel, RelationshipModel, RelationshipModelKind};
pub use schema::{
    ColumnDef, ColumnName, ColumnType, ComplexColumnType, ForeignKeyDef, IndexDef, IndexName,
    MetaData, SimpleColumnType, TableDef, TableName,
};
pub use value::Value;
