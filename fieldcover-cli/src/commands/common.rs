//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use fieldcover::config::{ConfigFile, ConfigKey};
use fieldcover::coverage::{GenerationConfig, GridPattern};
use fieldcover::geometry::DistanceUnit;
use fieldcover::tracking::TrackingConfig;

use crate::error::CliError;

/// Spacing unit for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum UnitsArg {
    /// Meters
    M,
    /// Kilometers
    Km,
}

impl From<UnitsArg> for DistanceUnit {
    fn from(units: UnitsArg) -> Self {
        match units {
            UnitsArg::M => DistanceUnit::Meters,
            UnitsArg::Km => DistanceUnit::Kilometers,
        }
    }
}

/// Grid lattice for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PatternArg {
    /// Square grid
    Rect,
    /// Hexagonal tiling centres
    Hex,
}

impl From<PatternArg> for GridPattern {
    fn from(pattern: PatternArg) -> Self {
        match pattern {
            PatternArg::Rect => GridPattern::Rectangular,
            PatternArg::Hex => GridPattern::Hexagonal,
        }
    }
}

/// Generation overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct GenerationOverrides {
    pub spacing: Option<f64>,
    pub units: Option<UnitsArg>,
    pub pattern: Option<PatternArg>,
    pub rotation: Option<f64>,
    pub margin: Option<f64>,
    pub roads: bool,
}

/// Resolve generation settings: CLI takes precedence, then config.
pub fn resolve_generation_config(
    overrides: &GenerationOverrides,
    config: &ConfigFile,
) -> GenerationConfig {
    let base = &config.generation;
    GenerationConfig {
        spacing: overrides.spacing.unwrap_or(base.spacing),
        units: overrides.units.map(Into::into).unwrap_or(base.units),
        pattern: overrides.pattern.map(Into::into).unwrap_or(base.pattern),
        rotation_degrees: overrides.rotation.unwrap_or(base.rotation_degrees),
        margin_meters: overrides.margin.unwrap_or(base.margin_meters),
        use_road_network: overrides.roads || base.use_road_network,
    }
}

/// Resolve visit rules: CLI takes precedence, then config.
///
/// Overrides are held to the same rules as the config keys they replace.
pub fn resolve_tracking_config(
    threshold: Option<f64>,
    accuracy_ceiling: Option<f64>,
    config: &ConfigFile,
) -> Result<TrackingConfig, CliError> {
    if let Some(value) = threshold {
        ConfigKey::TrackingVisitThresholdMeters.validate(&value.to_string())?;
    }
    if let Some(value) = accuracy_ceiling {
        ConfigKey::TrackingAccuracyCeilingMeters.validate(&value.to_string())?;
    }

    Ok(config
        .tracking
        .with_visit_threshold(threshold.unwrap_or(config.tracking.visit_threshold_meters))
        .with_accuracy_ceiling(
            accuracy_ceiling.unwrap_or(config.tracking.accuracy_ceiling_meters),
        ))
}

/// Read a whole text file.
pub fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Format seconds as `H:MM:SS`.
pub fn format_elapsed(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let mut config = ConfigFile::default();
        config.generation.spacing = 75.0;
        config.generation.rotation_degrees = 10.0;

        let overrides = GenerationOverrides {
            spacing: Some(0.2),
            units: Some(UnitsArg::Km),
            pattern: Some(PatternArg::Hex),
            ..Default::default()
        };
        let resolved = resolve_generation_config(&overrides, &config);

        assert_eq!(resolved.spacing, 0.2);
        assert_eq!(resolved.units, DistanceUnit::Kilometers);
        assert_eq!(resolved.pattern, GridPattern::Hexagonal);
        assert_eq!(resolved.rotation_degrees, 10.0);
        assert!(!resolved.use_road_network);
    }

    #[test]
    fn test_roads_flag_or_config_enables_road_mode() {
        let mut config = ConfigFile::default();
        let flag = GenerationOverrides {
            roads: true,
            ..Default::default()
        };
        assert!(resolve_generation_config(&flag, &config).use_road_network);

        config.generation.use_road_network = true;
        assert!(resolve_generation_config(&GenerationOverrides::default(), &config).use_road_network);
    }

    #[test]
    fn test_tracking_overrides() {
        let config = ConfigFile::default();
        let resolved = resolve_tracking_config(Some(30.0), None, &config).unwrap();
        assert_eq!(resolved.visit_threshold_meters, 30.0);
        assert_eq!(resolved.accuracy_ceiling_meters, 25.0);
    }

    #[test]
    fn test_invalid_tracking_overrides_rejected() {
        let config = ConfigFile::default();
        for bad in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                resolve_tracking_config(Some(bad), None, &config),
                Err(CliError::Config(_))
            ));
            assert!(matches!(
                resolve_tracking_config(None, Some(bad), &config),
                Err(CliError::Config(_))
            ));
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(3_725), "1:02:05");
    }

    #[test]
    fn test_read_text_missing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = read_text(&temp_dir.path().join("nope.geojson"));
        assert!(matches!(result, Err(CliError::FileRead { .. })));
    }
}
