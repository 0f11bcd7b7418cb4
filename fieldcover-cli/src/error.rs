//! CLI error handling with user-friendly messages.
//!
//! Centralizes error reporting for the CLI so every command exits with a
//! consistent message and exit code.

use std::path::PathBuf;
use std::process;

use fieldcover::config::ConfigError;
use fieldcover::coverage::GenerationError;
use fieldcover::project::ProjectError;
use fieldcover::roads::RoadDataError;
use fieldcover::tracking::TrackingError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Road data error: {0}")]
    RoadData(#[from] RoadDataError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

impl CliError {
    /// Print the error with any hints and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Generation(e) if e.is_retryable() => {
                eprintln!();
                eprintln!("The road network could not be downloaded. You can:");
                eprintln!("  1. Retry later, or raise roads.timeout_secs");
                eprintln!("  2. Point roads.overpass_url at another Overpass instance");
                eprintln!("  3. Supply roads yourself with --roads-file <FILE.geojson>");
            }
            CliError::Project(ProjectError::MissingPolygon) => {
                eprintln!();
                eprintln!("The input must contain a Polygon or MultiPolygon geometry.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
