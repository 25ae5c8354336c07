pub mod config;
pub mod engine;
pub mod file_format;
pub mod provider_kind;

pub use config::{CONFIG_FILE_NAME, EffigyConfig};
pub use engine::{
    CONNECT_ARGS, EngineOptions, EngineOpts, InMemoryConfig, MySqlConfig, PostgresConfig,
    merge_engine_opts,
};
pub use file_format::FileFormat;
pub use provider_kind::ProviderKind;

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn default_values_use_inmemory_and_models_dir() {
        let cfg = EffigyConfig::default();
        assert_eq!(cfg.models_dir, PathBuf::from("models"));
        assert_eq!(cfg.provider, ProviderKind::InMemory);
        assert_eq!(cfg.model_format, FileFormat::Json);
    }

    #[test]
    fn overrides_work_via_struct_update() {
        let cfg = EffigyConfig {
            models_dir: PathBuf::from("custom_models"),
            provider: ProviderKind::MySql,
            database_url: Some("mysql+pymysql://root@localhost/app".into()),
            ..Default::default()
        };

        assert_eq!(cfg.models_dir(), Path::new("custom_models"));
        assert!(cfg.provider().requires_url());
        assert_eq!(cfg.database_url(), Some("mysql+pymysql://root@localhost/app"));
    }
}
