// Logging/tracing setup for server mode
//
// Console output always, plus an optional daily-rolling file under logging.dir.

use anyhow::{Context, Result};
use madden_export_config::{normalize_log_level, LogFormat, LoggingConfig};
use std::path::Path;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// File name prefix for the rolling log; the date is appended per day
pub const LOG_FILE_NAME: &str = "madden-export.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging sink plus whatever must stay alive for it to flush
pub struct Logging {
    pub dispatch: Dispatch,
    _file_guard: Option<WorkerGuard>,
}

impl std::fmt::Debug for Logging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logging")
            .field("to_file", &self._file_guard.is_some())
            .finish()
    }
}

/// Build a dispatcher from LoggingConfig without installing it
pub fn build_logging(config: &LoggingConfig) -> Result<Logging> {
    let level = normalize_log_level(&config.level);
    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = vec![match config.format {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Text => fmt::layer().boxed(),
    }];

    let file_guard = if config.to_file {
        let dir = Path::new(&config.dir);
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        layers.push(match config.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
            LogFormat::Text => fmt::layer().with_ansi(false).with_writer(writer).boxed(),
        });
        Some(guard)
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry().with(layers).with(env_filter);

    Ok(Logging {
        dispatch: Dispatch::new(subscriber),
        _file_guard: file_guard,
    })
}

/// Build logging and install it as the process-wide default.
///
/// Keep the returned value alive for the life of the process so the file
/// writer flushes.
pub fn init_tracing(config: &LoggingConfig) -> Result<Logging> {
    let logging = build_logging(config)?;

    // Ignore error if already set (idempotent)
    let _ = tracing::dispatcher::set_global_default(logging.dispatch.clone());

    Ok(logging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::info;

    #[test]
    fn test_file_logging_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("logs");
        let config = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Text,
            to_file: true,
            dir: log_dir.to_string_lossy().into_owned(),
        };

        let logging = build_logging(&config).unwrap();
        tracing::dispatcher::with_default(&logging.dispatch, || {
            info!("written to the rolling file");
        });
        drop(logging);

        assert!(log_dir.is_dir());
        let names: Vec<String> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names.iter().any(|n| n.starts_with(LOG_FILE_NAME)),
            "{names:?}"
        );
    }

    #[test]
    fn test_console_only_touches_no_files() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("logs");
        let config = LoggingConfig {
            level: "warning".to_string(),
            format: LogFormat::Json,
            to_file: false,
            dir: log_dir.to_string_lossy().into_owned(),
        };

        let logging = build_logging(&config).unwrap();
        assert!(!log_dir.exists());
        assert!(format!("{logging:?}").contains("to_file: false"));
    }
}
