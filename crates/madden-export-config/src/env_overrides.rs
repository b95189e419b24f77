use super::{normalize_log_level, LogFormat, RuntimeConfig};
use anyhow::{anyhow, Context, Result};
use std::env;

pub const ENV_PREFIX: &str = "MADDEN_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    /// Get a variable by its name without the MADDEN_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

/// Apply environment-variable overrides to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Server configuration
    if let Some(addr) = get_env_string(env, "LISTEN_ADDR") {
        config.server.listen_addr = addr;
    }
    if let Some(port) = get_env_parsed::<_, u16>(env, "PORT")? {
        config.server.set_port(port);
    }
    if let Some(path) = get_env_string(env, "EXPORT_URL") {
        config.server.export_path = path;
    }
    if let Some(secs) = get_env_parsed::<_, u64>(env, "SHUTDOWN_GRACE_SECS")? {
        config.server.shutdown_grace_secs = secs;
    }

    // Storage
    if let Some(dir) = get_env_string(env, "DATA_DIR") {
        config.storage.data_dir = dir;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = normalize_log_level(&level);
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = format
            .parse::<LogFormat>()
            .context("Invalid MADDEN_LOG_FORMAT value")?;
    }
    if let Some(to_file) = get_env_string(env, "LOG_TO_FILE") {
        config.logging.to_file = to_file.trim().eq_ignore_ascii_case("true");
    }
    if let Some(dir) = get_env_string(env, "LOG_DIR") {
        config.logging.dir = dir;
    }

    // Request handling
    if let Some(val) = get_env_parsed::<_, usize>(env, "MAX_PAYLOAD_BYTES")? {
        config.request.max_payload_bytes = val;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|val| !val.is_empty())
}

fn get_env_parsed<E, T>(env: &E, key: &str) -> Result<Option<T>>
where
    E: EnvSource,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
