use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use effigy::{Database, EngineOpts, ModelContext, create_provider};
use effigy_config::{CONFIG_FILE_NAME, EffigyConfig, FileFormat, ProviderKind};
use effigy_core::EntityModel;

/// Load effigy.json config from current directory.
pub fn load_config() -> Result<EffigyConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        anyhow::bail!("{CONFIG_FILE_NAME} not found. Run 'effigy init' first.");
    }

    let content = fs::read_to_string(&path).with_context(|| format!("read {CONFIG_FILE_NAME}"))?;
    let config: EffigyConfig =
        serde_json::from_str(&content).with_context(|| format!("parse {CONFIG_FILE_NAME}"))?;
    Ok(config)
}

/// Load every entity model in the configured format from the models
/// directory, ordered by file name.
pub fn load_models(config: &EffigyConfig) -> Result<Vec<EntityModel>> {
    let models_dir = config.models_dir();
    if !models_dir.exists() {
        return Ok(Vec::new());
    }

    let format = config.model_format();
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(models_dir).context("read models directory")? {
        let path = entry.context("read directory entry")?.path();
        if path.is_file() && has_model_extension(&path, format) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut models = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("read model file: {}", path.display()))?;
        let model: EntityModel = match format {
            FileFormat::Json => serde_json::from_str(&content)
                .with_context(|| format!("parse JSON model: {}", path.display()))?,
            FileFormat::Yaml | FileFormat::Yml => serde_yaml::from_str(&content)
                .with_context(|| format!("parse YAML model: {}", path.display()))?,
        };
        tracing::debug!(entity = %model.name, path = %path.display(), "model loaded");
        models.push(model);
    }
    Ok(models)
}

/// YAML models may use either extension, whichever spelling is configured.
fn has_model_extension(path: &Path, format: FileFormat) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    match format {
        FileFormat::Json => ext == "json",
        FileFormat::Yaml | FileFormat::Yml => matches!(ext, "yaml" | "yml"),
    }
}

/// Builds the models into a database for the configured (or overridden)
/// provider.
pub fn open_database(config: &EffigyConfig, provider: Option<ProviderKind>) -> Result<Database> {
    let models = load_models(config)?;
    let context = ModelContext::new("models", models).context("declare entities")?;
    let kind = provider.unwrap_or(config.provider());
    let provider = create_provider(kind, config).context("create provider")?;
    Database::create(&context, Some(provider), None, EngineOpts::new()).context("build schema")
}
