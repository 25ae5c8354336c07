//! Map entity declarations onto relational tables and render the schema and
//! entity queries for a database provider.

pub mod context;
pub mod dbset;
pub mod error;
pub mod provider;

pub use context::{
    Database, DbContext, DbContextConfiguration, ModelContext, ResolvedConfiguration,
};
pub use dbset::{DbSet, Record};
pub use error::EffigyError;
pub use provider::{
    DatabaseProvider, InMemoryProvider, MySqlProvider, PostgresProvider, create_provider,
};

pub use effigy_builder::{
    BuilderError, DbBuilder, EntityConfiguration, ErrorKind, PropertyConfiguration,
    RelationshipConfiguration, TypeRegistry,
};
pub use effigy_config::{EffigyConfig, EngineOptions, EngineOpts, ProviderKind};
pub use effigy_core::{EntityModel, EntityType, FieldType, MappingRegistry, MetaData, Value};
pub use effigy_query::{DatabaseBackend, Filter, FilterOp};
