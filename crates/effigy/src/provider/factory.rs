use std::sync::Arc;

use effigy_config::{EffigyConfig, ProviderKind};

use super::{DatabaseProvider, InMemoryProvider, MySqlProvider, PostgresProvider};
use crate::error::EffigyError;

/// Builds the provider selected by `kind` from project configuration.
pub fn create_provider(
    kind: ProviderKind,
    config: &EffigyConfig,
) -> Result<Arc<dyn DatabaseProvider>, EffigyError> {
    let engine = config.engine().clone();
    let provider: Arc<dyn DatabaseProvider> = match kind {
        ProviderKind::InMemory => Arc::new(InMemoryProvider::new(engine, &config.inmemory)),
        ProviderKind::Postgres => Arc::new(PostgresProvider::new(
            require_url(kind, config)?,
            engine,
            config.postgres.clone(),
        )),
        ProviderKind::MySql => Arc::new(MySqlProvider::new(
            require_url(kind, config)?,
            engine,
            config.mysql.clone(),
        )),
    };
    tracing::debug!(provider = %kind, backend = %provider.backend(), "provider created");
    Ok(provider)
}

fn require_url(kind: ProviderKind, config: &EffigyConfig) -> Result<String, EffigyError> {
    config
        .database_url()
        .map(str::to_string)
        .ok_or_else(|| EffigyError::MissingDatabaseUrl {
            provider: kind.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use effigy_query::DatabaseBackend;
    use rstest::rstest;

    #[test]
    fn inmemory_needs_no_url() {
        let provider = create_provider(ProviderKind::InMemory, &EffigyConfig::default()).unwrap();
        assert_eq!(provider.connection_string(), "sqlite:///:memory:");
    }

    #[rstest]
    #[case(ProviderKind::Postgres)]
    #[case(ProviderKind::MySql)]
    fn server_providers_require_url(#[case] kind: ProviderKind) {
        let err = create_provider(kind, &EffigyConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("provider {} requires a databaseUrl", kind)
        );
    }

    #[rstest]
    #[case(ProviderKind::Postgres, "postgresql+psycopg://u:p@h:5432/d", DatabaseBackend::Postgres)]
    #[case(ProviderKind::MySql, "mysql+pymysql://u:p@h:3306/d", DatabaseBackend::MySql)]
    fn url_is_passed_through(
        #[case] kind: ProviderKind,
        #[case] url: &str,
        #[case] backend: DatabaseBackend,
    ) {
        let config = EffigyConfig {
            database_url: Some(url.into()),
            ..Default::default()
        };
        let provider = create_provider(kind, &config).unwrap();
        assert_eq!(provider.connection_string(), url);
        assert_eq!(provider.backend(), backend);
    }
}
