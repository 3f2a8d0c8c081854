use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use eyre::{Context, Result};

use crate::config::models::RouterConfig;

/// Prefix for environment overrides, e.g. `SWITCHYARD__HTTP_PATH`.
pub const ENV_PREFIX: &str = "SWITCHYARD";

/// Load configuration from a file using the config crate
/// Supports multiple formats: YAML, JSON, TOML, INI
pub async fn load_config(config_path: &str) -> Result<RouterConfig> {
    load_config_sync(config_path)
}

/// Load configuration synchronously
///
/// Route order in the file is preserved; environment variables prefixed with
/// `SWITCHYARD__` override scalar keys (`SWITCHYARD__GUARDS__LOWERCASE=false`).
pub fn load_config_sync(config_path: &str) -> Result<RouterConfig> {
    let config_path = Path::new(config_path);

    // Determine file format based on extension
    let format = match config_path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml,
    };

    let settings = Config::builder()
        .add_source(File::new(
            config_path
                .to_str()
                .ok_or_else(|| eyre::eyre!("Invalid UTF-8 path: {}", config_path.display()))?,
            format,
        ))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to build config from {}", config_path.display()))?;

    let router_config: RouterConfig = settings.try_deserialize().with_context(|| {
        format!(
            "Failed to deserialize config from {}",
            config_path.display()
        )
    })?;

    Ok(router_config)
}
