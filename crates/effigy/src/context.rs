use std::sync::Arc;

use effigy_builder::{BuilderError, DbBuilder, TypeRegistry};
use effigy_config::{EngineOpts, merge_engine_opts};
use effigy_core::{EntityModel, MappingRegistry, MetaData};
use effigy_query::{DatabaseBackend, build_create_schema, build_drop_schema};
use tracing::instrument;

use crate::dbset::DbSet;
use crate::error::EffigyError;
use crate::provider::DatabaseProvider;

/// Provider and engine options a context falls back to when none are passed
/// to [`Database::create`].
#[derive(Debug, Clone, Default)]
pub struct DbContextConfiguration {
    provider: Option<Arc<dyn DatabaseProvider>>,
    engine_opts: EngineOpts,
}

/// A validated [`DbContextConfiguration`].
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    pub provider: Arc<dyn DatabaseProvider>,
    pub engine_opts: EngineOpts,
}

impl DbContextConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn DatabaseProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Adds engine options; later calls win on conflicting keys.
    pub fn with_engine_opts(mut self, engine_opts: EngineOpts) -> Self {
        merge_engine_opts(&mut self.engine_opts, &engine_opts);
        self
    }

    pub fn build(&self) -> Result<ResolvedConfiguration, EffigyError> {
        let provider = self.provider.clone().ok_or(EffigyError::MissingProvider)?;
        Ok(ResolvedConfiguration {
            provider,
            engine_opts: self.engine_opts.clone(),
        })
    }
}

/// Declares the entities of a database and how they map onto tables.
pub trait DbContext {
    /// Every entity type the context can configure, including relationship
    /// targets.
    fn entities(&self) -> TypeRegistry;

    fn setup(&self, builder: &mut DbBuilder) -> Result<(), BuilderError>;

    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// A context assembled from declarative entity models.
#[derive(Debug, Clone)]
pub struct ModelContext {
    name: String,
    models: Vec<EntityModel>,
    registry: TypeRegistry,
}

impl ModelContext {
    pub fn new(name: impl Into<String>, models: Vec<EntityModel>) -> Result<Self, EffigyError> {
        let registry = TypeRegistry::from_models(&models).map_err(BuilderError::from)?;
        Ok(Self {
            name: name.into(),
            models,
            registry,
        })
    }

    pub fn models(&self) -> &[EntityModel] {
        &self.models
    }
}

impl DbContext for ModelContext {
    fn entities(&self) -> TypeRegistry {
        self.registry.clone()
    }

    fn setup(&self, builder: &mut DbBuilder) -> Result<(), BuilderError> {
        for model in &self.models {
            builder.configure_model(model)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A finalized context bound to a provider.
#[derive(Debug)]
pub struct Database {
    context: String,
    provider: Arc<dyn DatabaseProvider>,
    engine_opts: EngineOpts,
    metadata: MetaData,
    mappings: MappingRegistry,
}

impl Database {
    /// Resolves the provider, then runs the context's setup and finalizes the
    /// schema exactly once.
    ///
    /// An explicit `provider` wins over the configured one. `engine_opts`
    /// overlay the configured options, which overlay the provider's own.
    #[instrument(skip_all, fields(context = ctx.name()))]
    pub fn create<C: DbContext + ?Sized>(
        ctx: &C,
        provider: Option<Arc<dyn DatabaseProvider>>,
        config: Option<&DbContextConfiguration>,
        engine_opts: EngineOpts,
    ) -> Result<Self, EffigyError> {
        let resolved = config.map(DbContextConfiguration::build).transpose()?;
        let (provider, configured_opts) = match (provider, resolved) {
            (Some(provider), Some(resolved)) => (provider, resolved.engine_opts),
            (Some(provider), None) => (provider, EngineOpts::new()),
            (None, Some(resolved)) => (resolved.provider, resolved.engine_opts),
            (None, None) => {
                return Err(EffigyError::NoProvider {
                    context: ctx.name().to_string(),
                });
            }
        };

        let mut opts = provider.engine_options();
        merge_engine_opts(&mut opts, &configured_opts);
        merge_engine_opts(&mut opts, &engine_opts);

        let mut builder = DbBuilder::new(ctx.entities());
        ctx.setup(&mut builder)?;
        let mut mappings = MappingRegistry::new();
        let metadata = builder.finalize(&mut mappings)?;

        tracing::info!(
            backend = %provider.backend(),
            tables = metadata.len(),
            "database created"
        );
        Ok(Self {
            context: ctx.name().to_string(),
            provider,
            engine_opts: opts,
            metadata,
            mappings,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn provider(&self) -> &dyn DatabaseProvider {
        self.provider.as_ref()
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.provider.backend()
    }

    pub fn connection_string(&self) -> String {
        self.provider.connection_string()
    }

    /// Effective engine options after all overlays.
    pub fn engine_opts(&self) -> &EngineOpts {
        &self.engine_opts
    }

    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    pub fn mappings(&self) -> &MappingRegistry {
        &self.mappings
    }

    /// CREATE statements for every table, referenced tables first and each
    /// table's indexes right after it.
    pub fn create_schema_sql(&self) -> Result<Vec<String>, EffigyError> {
        let backend = self.backend();
        let queries = build_create_schema(&self.metadata, backend, true)?;
        tracing::debug!(statements = queries.len(), "create schema");
        Ok(queries.iter().map(|q| q.build(backend)).collect())
    }

    /// DROP statements in reverse dependency order.
    pub fn drop_schema_sql(&self) -> Result<Vec<String>, EffigyError> {
        let backend = self.backend();
        let queries = build_drop_schema(&self.metadata, true)?;
        tracing::debug!(statements = queries.len(), "drop schema");
        Ok(queries.iter().map(|q| q.build(backend)).collect())
    }

    /// Query and mutation entry point for one mapped entity.
    pub fn set(&self, entity: &str) -> Result<DbSet<'_>, EffigyError> {
        let mapper = self
            .mappings
            .mapper(entity)
            .ok_or_else(|| EffigyError::UnknownEntity {
                entity: entity.to_string(),
                known: self.known_entities(),
            })?;
        let table = self.metadata.require_table(mapper.table_name())?;
        Ok(DbSet::new(self.backend(), mapper, table))
    }

    fn known_entities(&self) -> String {
        let names: Vec<&str> = self.mappings.mappers().map(|m| m.entity().name()).collect();
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    }
}
