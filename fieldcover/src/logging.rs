//! Logging setup for fieldcover binaries.
//!
//! Installs a console layer on stderr and a non-blocking file layer that
//! rolls daily under the configured directory. `RUST_LOG`, when set and
//! valid, overrides the configured level.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Level used when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix of the daily log files (`fieldcover.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "fieldcover.log";

/// Accepted values for the `logging.level` setting.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Errors installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid log filter '{0}'")]
    InvalidLevel(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directory for the rolling log files.
    pub directory: PathBuf,
    /// Default filter directive, e.g. `info` or `fieldcover=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `~/.fieldcover/logs`.
pub fn default_log_directory() -> PathBuf {
    crate::config::config_directory().join("logs")
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the log directory cannot be created, the level does not parse
/// as a filter, or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(&config.directory).map_err(|source| LoggingError::Directory {
        path: config.directory.clone(),
        source,
    })?;

    let filter = build_filter(std::env::var("RUST_LOG").ok(), &config.level)?;

    let file_appender = tracing_appender::rolling::daily(&config.directory, LOG_FILE_PREFIX);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_timer(LocalTime::rfc_3339())
        .with_target(true);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(directory = %config.directory.display(), level = %config.level, "Logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Filter from `RUST_LOG` when it parses, else from the configured level.
fn build_filter(env_directive: Option<String>, level: &str) -> Result<EnvFilter, LoggingError> {
    if let Some(directive) = env_directive.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(&directive) {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(level).map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.directory.ends_with("logs"));
    }

    #[test]
    fn test_env_directive_overrides_level() {
        let filter = build_filter(Some("fieldcover=trace".to_string()), "warn").unwrap();
        assert_eq!(filter.to_string(), "fieldcover=trace");
    }

    #[test]
    fn test_blank_or_invalid_env_falls_back_to_level() {
        let filter = build_filter(Some("  ".to_string()), "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");

        let filter = build_filter(Some("fieldcover=verbose".to_string()), "warn").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result = build_filter(None, "fieldcover=verbose");
        assert!(matches!(result, Err(LoggingError::InvalidLevel(_))));
    }

    #[test]
    fn test_init_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            directory: temp.path().join("nested").join("logs"),
            level: "info".to_string(),
        };

        // A second global subscriber is refused; the directory exists either way.
        let first = init_logging(&config);
        assert!(config.directory.is_dir());
        if first.is_ok() {
            assert!(matches!(
                init_logging(&config),
                Err(LoggingError::AlreadyInitialized(_))
            ));
        }
    }
}
