//! User configuration stored at `~/.fieldcover/config.ini`.
//!
//! [`ConfigFile`] groups the settings of each component in its own section.
//! A missing file, section or key falls back to the component defaults, so a
//! fresh install works without running `fieldcover init`.
//!
//! ```ini
//! [generation]
//! spacing = 50
//! units = m
//! pattern = rect
//!
//! [tracking]
//! visit_threshold_meters = 15
//! ```
//!
//! Individual keys are addressed as `section.key` through [`ConfigKey`],
//! which validates values before writing them into the config.

mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigError};
pub use keys::ConfigKey;
pub use settings::{ConfigFile, RoadSettings};
