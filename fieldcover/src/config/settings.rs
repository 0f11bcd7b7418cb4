//! Settings structs grouped by INI section.

use std::time::Duration;

use crate::coverage::{GenerationConfig, DEFAULT_ROAD_FETCH_TIMEOUT};
use crate::logging::LoggingConfig;
use crate::roads::DEFAULT_OVERPASS_URL;
use crate::tracking::TrackingConfig;

/// Everything in `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    /// `[generation]`
    pub generation: GenerationConfig,
    /// `[tracking]`
    pub tracking: TrackingConfig,
    /// `[roads]`
    pub roads: RoadSettings,
    /// `[logging]`
    pub logging: LoggingConfig,
}

/// Road network download settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadSettings {
    /// Overpass API interpreter endpoint.
    pub overpass_url: String,
    /// Upper bound on one road fetch, in seconds.
    pub timeout_secs: u64,
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout_secs: DEFAULT_ROAD_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl RoadSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
