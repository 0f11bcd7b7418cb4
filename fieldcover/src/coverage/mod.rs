//! Point coverage generation
//!
//! Turns a polygon and a [`GenerationConfig`] into a deterministic
//! [`CoverageSet`], either by tessellating the polygon with a rectangular or
//! hexagonal lattice or by sampling along a road network.
//!
//! # Example
//!
//! ```
//! use fieldcover::coverage::{generate, GenerationConfig, GridPattern};
//! use fieldcover::geometry::{Coord, DistanceUnit, Polygon};
//!
//! let area = Polygon::from_ring(vec![
//!     Coord::new(10.0, 53.0),
//!     Coord::new(10.01, 53.0),
//!     Coord::new(10.01, 53.01),
//!     Coord::new(10.0, 53.01),
//! ])
//! .unwrap();
//!
//! let config = GenerationConfig::new(100.0, DistanceUnit::Meters)
//!     .with_pattern(GridPattern::Hexagonal)
//!     .with_rotation(15.0);
//! let points = generate(&area, &config).unwrap();
//! assert!(!points.is_empty());
//! ```

mod config;
mod error;
mod generator;
mod road_sampler;
mod tessellator;
mod types;

pub use config::{
    GenerationConfig, GridPattern, DEFAULT_SPACING, DEFAULT_SPACING_UNITS,
    ROAD_MIN_SEPARATION_FACTOR,
};
pub use error::GenerationError;
pub use generator::{generate, generate_from_roads, Generator, DEFAULT_ROAD_FETCH_TIMEOUT};
pub use road_sampler::sample_along_roads;
pub use tessellator::{tessellate, MAX_CANDIDATES};
pub use types::{CoveragePoint, CoverageSet, PointStatus};
