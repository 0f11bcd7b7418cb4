//! Configuration for coverage generation.

use std::fmt;

use super::error::GenerationError;
use crate::geometry::DistanceUnit;

/// Default spacing between points.
pub const DEFAULT_SPACING: f64 = 50.0;

/// Default unit for [`DEFAULT_SPACING`].
pub const DEFAULT_SPACING_UNITS: DistanceUnit = DistanceUnit::Meters;

/// Fraction of the spacing below which road samples count as duplicates.
pub const ROAD_MIN_SEPARATION_FACTOR: f64 = 0.8;

/// Lattice pattern for grid generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridPattern {
    /// Square lattice, both axes stepped by the spacing.
    #[default]
    Rectangular,
    /// Centres of a hexagonal tiling (offset rows).
    Hexagonal,
}

impl GridPattern {
    /// Short name used in config files and project documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            GridPattern::Rectangular => "rect",
            GridPattern::Hexagonal => "hex",
        }
    }

    /// Parse from config string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rect" | "rectangular" => Some(GridPattern::Rectangular),
            "hex" | "hexagonal" => Some(GridPattern::Hexagonal),
            _ => None,
        }
    }
}

impl fmt::Display for GridPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully specified generation settings.
///
/// Defaults are applied once, here; the algorithms never merge partial
/// settings. When `use_road_network` is set, `pattern` and
/// `rotation_degrees` are kept (so they survive a save) but ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Distance between neighbouring points, in `units`.
    pub spacing: f64,

    /// Unit of `spacing`.
    pub units: DistanceUnit,

    /// Lattice pattern (grid mode only).
    pub pattern: GridPattern,

    /// Lattice rotation in degrees, counter-clockwise, in [0, 360)
    /// (grid mode only).
    pub rotation_degrees: f64,

    /// Inward margin from the polygon edge in meters (grid mode only).
    pub margin_meters: f64,

    /// Sample along roads instead of tessellating.
    pub use_road_network: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            units: DEFAULT_SPACING_UNITS,
            pattern: GridPattern::Rectangular,
            rotation_degrees: 0.0,
            margin_meters: 0.0,
            use_road_network: false,
        }
    }
}

impl GenerationConfig {
    /// Create a configuration with the given spacing; other fields default.
    pub fn new(spacing: f64, units: DistanceUnit) -> Self {
        Self {
            spacing,
            units,
            ..Default::default()
        }
    }

    /// Set the lattice pattern.
    pub fn with_pattern(mut self, pattern: GridPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the lattice rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Set the inward margin in meters.
    pub fn with_margin_meters(mut self, meters: f64) -> Self {
        self.margin_meters = meters;
        self
    }

    /// Enable or disable road-network sampling.
    pub fn with_road_network(mut self, enabled: bool) -> Self {
        self.use_road_network = enabled;
        self
    }

    /// Spacing converted to meters.
    pub fn spacing_meters(&self) -> f64 {
        self.units.to_meters(self.spacing)
    }

    /// Reject configurations no algorithm can run with.
    ///
    /// Rotation is only checked in grid mode because road sampling ignores
    /// it.
    pub fn validate(&self) -> Result<(), GenerationError> {
        validate_spacing(self.spacing)?;

        if !self.margin_meters.is_finite() || self.margin_meters < 0.0 {
            return Err(GenerationError::InvalidConfig(format!(
                "margin must be a non-negative number of meters, got {}",
                self.margin_meters
            )));
        }

        if !self.use_road_network
            && !(self.rotation_degrees.is_finite() && (0.0..360.0).contains(&self.rotation_degrees))
        {
            return Err(GenerationError::InvalidConfig(format!(
                "rotation must be in [0, 360) degrees, got {}",
                self.rotation_degrees
            )));
        }

        Ok(())
    }
}

/// Spacing must be a positive, finite distance.
pub(crate) fn validate_spacing(spacing: f64) -> Result<(), GenerationError> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(GenerationError::InvalidConfig(format!(
            "spacing must be a positive distance, got {}",
            spacing
        )));
    }
    Ok(())
}
