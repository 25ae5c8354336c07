pub mod builder;
pub mod classify;
pub mod error;
pub mod index;
pub mod model;
pub mod property;
pub mod registry;
pub mod relationship;
pub mod table;

pub use builder::{DbBuilder, EntityConfiguration};
pub use classify::{FieldClass, classify_field, column_type};
pub use error::{BuilderError, ErrorKind};
pub use index::IndexConfiguration;
pub use property::PropertyConfiguration;
pub use registry::TypeRegistry;
pub use relationship::RelationshipConfiguration;
pub use table::create_table;
