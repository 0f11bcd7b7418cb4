//! Project persistence as GeoJSON
//!
//! A project is one FeatureCollection: the survey polygon first, then the
//! coverage points with their `index`, and a top-level `properties` object
//! holding the name, timestamps and generation settings.
//!
//! ```text
//! { "type": "FeatureCollection",
//!   "properties": { "name", "createdAt", "updatedAt",
//!                   "settings": { spacing, units, gridType, rotation,
//!                                 marginMeters, useRoads } },
//!   "features": [ polygon, point(index 0), point(index 1), ... ] }
//! ```

mod document;
mod error;
pub mod geojson;

pub use document::{ProjectDocument, UNTITLED_PROJECT};
pub use error::ProjectError;
pub use geojson::{parse_polygon, parse_roads};
