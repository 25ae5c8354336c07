use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use effigy_config::{CONFIG_FILE_NAME, EffigyConfig, FileFormat, ProviderKind};

pub fn cmd_init(provider: Option<ProviderKind>, format: Option<FileFormat>) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{CONFIG_FILE_NAME} already exists");
    }

    let mut config = EffigyConfig::default();
    if let Some(provider) = provider {
        config.provider = provider;
    }
    if let Some(format) = format {
        config.model_format = format;
    }
    let json = serde_json::to_string_pretty(&config).context("serialize default config")?;
    fs::write(&path, json).with_context(|| format!("write {CONFIG_FILE_NAME}"))?;
    println!("created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::load_config;
    use crate::utils::testing::CwdGuard;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn cmd_init_creates_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(None, None).unwrap();
        assert!(PathBuf::from(CONFIG_FILE_NAME).exists());
        assert_eq!(load_config().unwrap(), EffigyConfig::default());
    }

    #[test]
    #[serial]
    fn cmd_init_applies_overrides() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(Some(ProviderKind::Postgres), Some(FileFormat::Yaml)).unwrap();
        let config = load_config().unwrap();
        assert_eq!(config.provider, ProviderKind::Postgres);
        assert_eq!(config.model_format, FileFormat::Yaml);
    }

    #[test]
    #[serial]
    fn cmd_init_fails_when_exists() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(None, None).unwrap();
        let err = cmd_init(None, None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
