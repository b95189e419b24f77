use anyhow::{Context, Result};
use clap::Parser;
use madden_export_config::{normalize_log_level, LogFormat, RuntimeConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Webhook receiver for Madden companion app league exports
#[derive(Parser)]
#[command(name = "madden-export")]
#[command(version)]
#[command(about = "Webhook receiver for Madden companion app league exports", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config file)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// URL path the companion app posts to
    #[arg(long, value_name = "PATH")]
    export_url: Option<String>,

    /// Directory exports are written to
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also write logs to a daily file in --log-dir
    #[arg(long, value_name = "BOOL")]
    log_to_file: Option<bool>,

    /// Directory for log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Step 1: Load base configuration (defaults < file < environment)
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    // Step 3: Initialize tracing; the guard keeps the log file flushing
    let logging = madden_export_server::init_tracing(&config.logging)?;

    // Step 4: Make sure exports can actually be written
    validate_data_dir(config.storage.data_dir())?;

    display_startup_info(&config);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(madden_export_server::run_with_config(
            config,
            logging.dispatch.clone(),
        ))
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(port) = cli.port {
        config.server.set_port(port);
    }
    if let Some(export_url) = &cli.export_url {
        config.server.export_path = export_url.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.to_string_lossy().to_string();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = normalize_log_level(level);
    }
    if let Some(to_file) = cli.log_to_file {
        config.logging.to_file = to_file;
    }
    if let Some(log_dir) = &cli.log_dir {
        config.logging.dir = log_dir.to_string_lossy().to_string();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
}

fn validate_data_dir(data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        info!("Creating data directory: {}", data_dir.display());
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;
    }

    // Validate writability by creating a test file
    let test_file = data_dir.join(".madden-export-write-test");
    fs::write(&test_file, b"test").with_context(|| {
        format!(
            "Data directory '{}' is not writable. Check permissions.",
            data_dir.display()
        )
    })?;
    fs::remove_file(&test_file).context("Failed to remove test file")?;
    info!("Data directory validated: {}", data_dir.display());

    Ok(())
}

fn display_startup_info(config: &RuntimeConfig) {
    info!("╭─────────────────────────────────────────────────");
    info!("│ madden-export v{}", env!("CARGO_PKG_VERSION"));
    info!("├─────────────────────────────────────────────────");
    info!("│ Listen address: http://{}", config.server.listen_addr);
    info!("│ Export path: {}", config.server.normalized_export_path());
    info!("│ Data directory: {}", config.storage.data_dir);
    info!("│ Log level: {}", config.logging.level);
    if config.logging.to_file {
        info!("│ Log directory: {}", config.logging.dir);
    }
    info!("╰─────────────────────────────────────────────────");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overridden(args: &[&str]) -> RuntimeConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut config = RuntimeConfig::default();
        apply_cli_overrides(&mut config, &cli);
        config
    }

    #[test]
    fn test_cli_log_level_is_normalized() {
        assert_eq!(
            overridden(&["madden-export", "--log-level", "WARNING"]).logging.level,
            "warn"
        );
        assert_eq!(
            overridden(&["madden-export", "-v", "Info"]).logging.level,
            "info"
        );
        assert_eq!(
            overridden(&["madden-export", "--log-level", "loud"]).logging.level,
            "debug"
        );
    }

    #[test]
    fn test_cli_overrides() {
        let config = overridden(&[
            "madden-export",
            "--port",
            "9090",
            "--export-url",
            "/madden",
            "--data-dir",
            "/tmp/exports",
            "--log-to-file",
            "false",
            "--log-format",
            "json",
        ]);

        assert_eq!(config.server.listen_addr, "0.0.0.0:9090");
        assert_eq!(config.server.export_path, "/madden");
        assert_eq!(config.storage.data_dir, "/tmp/exports");
        assert!(!config.logging.to_file);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        assert_eq!(overridden(&["madden-export"]), RuntimeConfig::default());
    }
}
