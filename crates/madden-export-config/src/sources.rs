// Configuration source loading.
//
// Priority order:
// 1. Environment variables (MADDEN_* prefix)
// 2. Config file path from MADDEN_CONFIG
// 3. Inline config content from MADDEN_CONFIG_CONTENT
// 4. Default config files (./config.toml, ./.madden-export.toml)
// 5. Built-in defaults

use crate::env_overrides::{apply_env_overrides, EnvSource};
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./config.toml", "./.madden-export.toml"];

/// Load configuration from the first available file source, then the environment.
pub fn load_config<E: EnvSource>(env: &E) -> Result<RuntimeConfig> {
    let mut config = load_from_file(env)?.unwrap_or_default();
    apply_env_overrides(&mut config, env)?;
    Ok(config)
}

/// Load configuration from a specific file path (for the CLI --config flag).
/// Returns error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path<E: EnvSource>(path: impl AsRef<Path>, env: &E) -> Result<RuntimeConfig> {
    let mut config = read_config_file(path.as_ref())?;
    apply_env_overrides(&mut config, env)?;
    Ok(config)
}

fn load_from_file<E: EnvSource>(env: &E) -> Result<Option<RuntimeConfig>> {
    if let Some(path) = env.get("CONFIG") {
        return read_config_file(Path::new(&path)).map(Some);
    }

    if let Some(content) = env.get("CONFIG_CONTENT") {
        let config: RuntimeConfig = toml::from_str(&content)
            .context("Failed to parse inline config from MADDEN_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            return read_config_file(path).map(Some);
        }
    }

    Ok(None)
}

fn read_config_file(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
