//! CLI runner for common setup.
//!
//! Loads the config file, installs logging and builds the async runtime for
//! the commands that need one.

use tokio::runtime::Runtime;
use tracing::info;

use fieldcover::config::ConfigFile;
use fieldcover::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Owns the loaded config and keeps logging alive.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let logging_guard =
            init_logging(&config.logging).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!("FieldCover v{}", fieldcover::VERSION);
        info!("FieldCover CLI: {} command", command);
    }

    /// Multi-threaded runtime for generation and tracking.
    pub fn runtime(&self) -> Result<Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("fieldcover-worker")
            .build()
            .map_err(CliError::Runtime)
    }
}
