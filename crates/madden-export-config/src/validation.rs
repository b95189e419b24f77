// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_server_config(&config.server)?;
    validate_storage_config(&config.storage)?;
    validate_logging_config(&config.logging)?;
    validate_request_config(&config.request)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.listen_addr.is_empty() {
        bail!("server.listen_addr must not be empty");
    }

    // Basic validation that it looks like an address
    if !config.listen_addr.contains(':') {
        bail!("server.listen_addr must be in format 'host:port'");
    }

    if !config.export_path.starts_with('/') {
        bail!("server.export_path must start with '/'");
    }

    if config.normalized_export_path() == "/" {
        bail!("server.export_path must not be the root path");
    }

    // Route parameters and wildcards would be parsed by the router
    if config
        .export_path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
        || config.export_path.contains(|c: char| c == '{' || c == '}')
    {
        bail!(
            "server.export_path must be a literal path without ':', '*' or '{{}}' segments, got '{}'",
            config.export_path
        );
    }

    if config.shutdown_grace_secs == 0 {
        bail!("server.shutdown_grace_secs must be greater than 0");
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    if config.data_dir.trim().is_empty() {
        bail!("storage.data_dir must not be empty");
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.to_file && config.dir.trim().is_empty() {
        bail!("logging.dir must not be empty when logging.to_file is enabled");
    }

    Ok(())
}

fn validate_request_config(config: &RequestConfig) -> Result<()> {
    if config.max_payload_bytes == 0 {
        bail!("request.max_payload_bytes must be greater than 0");
    }

    // Warn about very large payloads
    if config.max_payload_bytes > 100 * 1024 * 1024 {
        // 100 MB
        warn!(
            max_payload_bytes = config.max_payload_bytes,
            "request.max_payload_bytes is very large; may cause issues"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_server_config() {
        let valid = ServerConfig::default();
        assert!(validate_server_config(&valid).is_ok());

        let no_port = ServerConfig {
            listen_addr: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(validate_server_config(&no_port).is_err());

        let relative = ServerConfig {
            export_path: "export".to_string(),
            ..ServerConfig::default()
        };
        assert!(validate_server_config(&relative).is_err());

        let root = ServerConfig {
            export_path: "//".to_string(),
            ..ServerConfig::default()
        };
        assert!(validate_server_config(&root).is_err());

        for pattern in ["/:league", "/export/*rest", "/export/{id}"] {
            let routed = ServerConfig {
                export_path: pattern.to_string(),
                ..ServerConfig::default()
            };
            assert!(validate_server_config(&routed).is_err(), "{pattern}");
        }

        let nested = ServerConfig {
            export_path: "/api/madden-export/".to_string(),
            ..ServerConfig::default()
        };
        assert!(validate_server_config(&nested).is_ok());

        let no_grace = ServerConfig {
            shutdown_grace_secs: 0,
            ..ServerConfig::default()
        };
        assert!(validate_server_config(&no_grace).is_err());
    }

    #[test]
    fn test_validate_storage_and_logging() {
        let empty = StorageConfig {
            data_dir: "  ".to_string(),
        };
        assert!(validate_storage_config(&empty).is_err());

        let file_without_dir = LoggingConfig {
            dir: String::new(),
            ..LoggingConfig::default()
        };
        assert!(validate_logging_config(&file_without_dir).is_err());

        let console_only = LoggingConfig {
            dir: String::new(),
            to_file: false,
            ..LoggingConfig::default()
        };
        assert!(validate_logging_config(&console_only).is_ok());
    }

    #[test]
    fn test_validate_request_config() {
        assert!(validate_request_config(&RequestConfig {
            max_payload_bytes: 0
        })
        .is_err());
        assert!(validate_request_config(&RequestConfig::default()).is_ok());
    }
}
