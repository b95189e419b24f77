// madden-export-config - Configuration for the export receiver
//
// Supports configuration from multiple sources:
// 1. Command-line flags (applied by the binary, highest priority)
// 2. Environment variables (MADDEN_* prefix)
// 3. Config file path from MADDEN_CONFIG env var
// 4. Config file contents from MADDEN_CONFIG_CONTENT env var
// 5. Default config file locations (./config.toml, ./.madden-export.toml)
// 6. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, StdEnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub request: RequestConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// URL path the companion app posts to
    pub export_path: String,
    /// How long in-flight requests may take to finish after a shutdown signal
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            export_path: "/export".to_string(),
            shutdown_grace_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Replace the port of `listen_addr`, keeping the host
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host)
            .filter(|host| !host.is_empty())
            .unwrap_or("0.0.0.0");
        self.listen_addr = format!("{}:{}", host, port);
    }

    /// Export path without trailing slashes
    pub fn normalized_export_path(&self) -> String {
        let trimmed = self.export_path.trim_end_matches('/');
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Where exports are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub to_file: bool,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Text,
            to_file: true,
            dir: "./logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

/// Map a user-supplied level to a canonical one; unknown values fall back to debug
pub fn normalize_log_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "debug",
    }
    .to_string()
}

/// Request handling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub max_payload_bytes: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        sources::load_config(&StdEnvSource)
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path, &StdEnvSource)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = RuntimeConfig::default();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.server.export_path, "/export");
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.logging.to_file);
        assert_eq!(config.logging.dir, "./logs");
        assert_eq!(config.request.max_payload_bytes, 8 * 1024 * 1024);
    }

    #[test]
    fn test_set_port_keeps_host() {
        let mut server = ServerConfig::default();
        server.set_port(9000);
        assert_eq!(server.listen_addr, "0.0.0.0:9000");

        server.listen_addr = "127.0.0.1:1".to_string();
        server.set_port(3000);
        assert_eq!(server.listen_addr, "127.0.0.1:3000");

        server.listen_addr = "garbage".to_string();
        server.set_port(3001);
        assert_eq!(server.listen_addr, "0.0.0.0:3001");
    }

    #[test]
    fn test_normalized_export_path() {
        let mut server = ServerConfig::default();
        assert_eq!(server.normalized_export_path(), "/export");

        server.export_path = "/madden/".to_string();
        assert_eq!(server.normalized_export_path(), "/madden");

        server.export_path = "export".to_string();
        assert_eq!(server.normalized_export_path(), "/export");
    }

    #[test]
    fn test_normalize_log_level() {
        assert_eq!(normalize_log_level("INFO"), "info");
        assert_eq!(normalize_log_level("warning"), "warn");
        assert_eq!(normalize_log_level("error"), "error");
        assert_eq!(normalize_log_level("verbose"), "debug");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [server]
            export_path = "/madden"

            [logging]
            format = "json"
            to_file = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.export_path, "/madden");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.to_file);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage, StorageConfig::default());
    }
}
