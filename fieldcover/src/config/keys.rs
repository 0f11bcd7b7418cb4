//! Addressing single settings as `section.key`.
//!
//! Used by `fieldcover config get|set|list` and by the INI parser, so a
//! value accepted on the command line is exactly a value accepted in the
//! file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::file::ConfigError;
use super::settings::ConfigFile;
use crate::coverage::GridPattern;
use crate::geometry::DistanceUnit;
use crate::logging::LOG_LEVELS;

/// A configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    GenerationSpacing,
    GenerationUnits,
    GenerationPattern,
    GenerationRotation,
    GenerationMarginMeters,
    GenerationUseRoads,
    TrackingVisitThresholdMeters,
    TrackingAccuracyCeilingMeters,
    RoadsOverpassUrl,
    RoadsTimeoutSecs,
    LoggingDirectory,
    LoggingLevel,
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GenerationSpacing,
            ConfigKey::GenerationUnits,
            ConfigKey::GenerationPattern,
            ConfigKey::GenerationRotation,
            ConfigKey::GenerationMarginMeters,
            ConfigKey::GenerationUseRoads,
            ConfigKey::TrackingVisitThresholdMeters,
            ConfigKey::TrackingAccuracyCeilingMeters,
            ConfigKey::RoadsOverpassUrl,
            ConfigKey::RoadsTimeoutSecs,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingLevel,
        ]
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GenerationSpacing => "generation.spacing",
            ConfigKey::GenerationUnits => "generation.units",
            ConfigKey::GenerationPattern => "generation.pattern",
            ConfigKey::GenerationRotation => "generation.rotation",
            ConfigKey::GenerationMarginMeters => "generation.margin_meters",
            ConfigKey::GenerationUseRoads => "generation.use_roads",
            ConfigKey::TrackingVisitThresholdMeters => "tracking.visit_threshold_meters",
            ConfigKey::TrackingAccuracyCeilingMeters => "tracking.accuracy_ceiling_meters",
            ConfigKey::RoadsOverpassUrl => "roads.overpass_url",
            ConfigKey::RoadsTimeoutSecs => "roads.timeout_secs",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingLevel => "logging.level",
        }
    }

    /// INI section name.
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or_default()
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or_default()
    }

    /// Current value as written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GenerationSpacing => config.generation.spacing.to_string(),
            ConfigKey::GenerationUnits => config.generation.units.suffix().to_string(),
            ConfigKey::GenerationPattern => config.generation.pattern.as_str().to_string(),
            ConfigKey::GenerationRotation => config.generation.rotation_degrees.to_string(),
            ConfigKey::GenerationMarginMeters => config.generation.margin_meters.to_string(),
            ConfigKey::GenerationUseRoads => config.generation.use_road_network.to_string(),
            ConfigKey::TrackingVisitThresholdMeters => {
                config.tracking.visit_threshold_meters.to_string()
            }
            ConfigKey::TrackingAccuracyCeilingMeters => {
                config.tracking.accuracy_ceiling_meters.to_string()
            }
            ConfigKey::RoadsOverpassUrl => config.roads.overpass_url.clone(),
            ConfigKey::RoadsTimeoutSecs => config.roads.timeout_secs.to_string(),
            ConfigKey::LoggingDirectory => path_to_display(&config.logging.directory),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
        }
    }

    /// Validate `value` and store it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        self.validate(value)?;

        match self {
            ConfigKey::GenerationSpacing => config.generation.spacing = self.number(value)?,
            ConfigKey::GenerationUnits => {
                config.generation.units = DistanceUnit::from_config_str(value)
                    .ok_or_else(|| self.invalid("must be m or km"))?;
            }
            ConfigKey::GenerationPattern => {
                config.generation.pattern = GridPattern::from_config_str(value)
                    .ok_or_else(|| self.invalid("must be rect or hex"))?;
            }
            ConfigKey::GenerationRotation => {
                config.generation.rotation_degrees = self.number(value)?;
            }
            ConfigKey::GenerationMarginMeters => {
                config.generation.margin_meters = self.number(value)?;
            }
            ConfigKey::GenerationUseRoads => {
                config.generation.use_road_network =
                    parse_bool(value).ok_or_else(|| self.invalid("must be true or false"))?;
            }
            ConfigKey::TrackingVisitThresholdMeters => {
                config.tracking.visit_threshold_meters = self.number(value)?;
            }
            ConfigKey::TrackingAccuracyCeilingMeters => {
                config.tracking.accuracy_ceiling_meters = self.number(value)?;
            }
            ConfigKey::RoadsOverpassUrl => config.roads.overpass_url = value.to_string(),
            ConfigKey::RoadsTimeoutSecs => {
                config.roads.timeout_secs = value
                    .parse()
                    .map_err(|_| self.invalid("must be a positive integer"))?;
            }
            ConfigKey::LoggingDirectory => config.logging.directory = expand_tilde(value),
            ConfigKey::LoggingLevel => config.logging.level = value.to_lowercase(),
        }
        Ok(())
    }

    /// Check `value` without storing it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| self.invalid(&reason))
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::GenerationSpacing => Box::new(PositiveNumberSpec),
            ConfigKey::GenerationUnits => Box::new(OneOfSpec::new(&["m", "km"])),
            ConfigKey::GenerationPattern => Box::new(OneOfSpec::new(&["rect", "hex"])),
            ConfigKey::GenerationRotation => Box::new(AngleSpec),
            ConfigKey::GenerationMarginMeters => Box::new(NonNegativeNumberSpec),
            ConfigKey::GenerationUseRoads => Box::new(BooleanSpec),
            ConfigKey::TrackingVisitThresholdMeters => Box::new(PositiveNumberSpec),
            ConfigKey::TrackingAccuracyCeilingMeters => Box::new(PositiveNumberSpec),
            ConfigKey::RoadsOverpassUrl => Box::new(UrlSpec),
            ConfigKey::RoadsTimeoutSecs => Box::new(PositiveIntegerSpec),
            ConfigKey::LoggingDirectory => Box::new(PathSpec),
            ConfigKey::LoggingLevel => Box::new(OneOfSpec::new(LOG_LEVELS)),
        }
    }

    fn number(&self, value: &str) -> Result<f64, ConfigError> {
        value.parse().map_err(|_| self.invalid("must be a number"))
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Value specifications
// =============================================================================

trait ValueSpecification {
    /// `Err(reason)` when the value is unacceptable.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Case-insensitive membership in a fixed set.
struct OneOfSpec {
    allowed: &'static [&'static str],
}

impl OneOfSpec {
    fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }
}

impl ValueSpecification for OneOfSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.to_lowercase();
        if self.allowed.contains(&lower.as_str()) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.allowed.join(", ")))
        }
    }
}

fn finite_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match finite_number(value) {
            Some(n) if n > 0.0 => Ok(()),
            _ => Err("must be a number greater than 0".to_string()),
        }
    }
}

struct NonNegativeNumberSpec;

impl ValueSpecification for NonNegativeNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match finite_number(value) {
            Some(n) if n >= 0.0 => Ok(()),
            _ => Err("must be a number of 0 or more".to_string()),
        }
    }
}

/// Degrees in [0, 360).
struct AngleSpec;

impl ValueSpecification for AngleSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match finite_number(value) {
            Some(n) if (0.0..360.0).contains(&n) => Ok(()),
            _ => Err("must be an angle from 0 up to (not including) 360".to_string()),
        }
    }
}

struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

struct BooleanSpec;

impl ValueSpecification for BooleanSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        parse_bool(value)
            .map(|_| ())
            .ok_or_else(|| "must be true/false, yes/no, on/off or 1/0".to_string())
    }
}

struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("must start with http:// or https://".to_string())
        }
    }
}

struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("must not be empty".to_string())
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Path for display, with the home directory collapsed to `~`.
pub(super) fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
