//! Geometry kernel
//!
//! Planar and great-circle primitives over geographic coordinates
//! (longitude, latitude in degrees) used by point generation and tracking.
//!
//! # Conventions
//!
//! - Coordinates are `(lon, lat)`, GeoJSON order.
//! - Distances always carry an explicit [`DistanceUnit`].
//! - Rotation angles are degrees, positive counter-clockwise.
//! - Points on a polygon boundary are **outside** (see [`point_in_polygon`]).
//! - Inputs are never mutated; transforms return new geometries.
//!
//! # Example
//!
//! ```
//! use fieldcover::geometry::{point_in_polygon, Coord, Polygon};
//!
//! let square = Polygon::from_ring(vec![
//!     Coord::new(0.0, 0.0),
//!     Coord::new(0.01, 0.0),
//!     Coord::new(0.01, 0.01),
//!     Coord::new(0.0, 0.01),
//! ])
//! .unwrap();
//!
//! assert!(point_in_polygon(Coord::new(0.005, 0.005), &square));
//! assert!(!point_in_polygon(Coord::new(0.0, 0.005), &square));
//! ```

mod buffer;
mod distance;
mod line;
mod polygon;
mod rotate;
mod types;

pub use buffer::{buffer_inward, Buffered};
pub use distance::{
    bearing, destination, distance, distance_meters, meters_per_degree, EARTH_RADIUS_METERS,
};
pub use line::{line_length, point_at_distance};
pub use polygon::{centroid, point_in_polygon, BOUNDARY_EPSILON_DEG};
pub use rotate::{rotate_coord, rotate_coords, rotate_polygon};
pub use types::{BoundingBox, Coord, DistanceUnit, GeometryError, LineString, Polygon};

/// Bounding box of any non-empty coordinate sequence.
///
/// Returns `None` for an empty sequence.
pub fn bounding_box(coords: &[Coord]) -> Option<BoundingBox> {
    BoundingBox::from_coords(coords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_of_points() {
        let bbox = bounding_box(&[
            Coord::new(3.0, -1.0),
            Coord::new(-2.0, 4.0),
            Coord::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(bbox.to_array(), [-2.0, -1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_bounding_box_single_point() {
        let bbox = bounding_box(&[Coord::new(1.0, 2.0)]).unwrap();
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric(
                lon1 in -180.0..180.0_f64,
                lat1 in -85.0..85.0_f64,
                lon2 in -180.0..180.0_f64,
                lat2 in -85.0..85.0_f64,
            ) {
                let a = Coord::new(lon1, lat1);
                let b = Coord::new(lon2, lat2);
                let ab = distance(a, b, DistanceUnit::Meters);
                let ba = distance(b, a, DistanceUnit::Meters);
                prop_assert!((ab - ba).abs() < 1e-6);
                prop_assert!(ab >= 0.0);
            }

            #[test]
            fn test_rotation_roundtrip_property(
                lon in -179.0..179.0_f64,
                lat in -80.0..80.0_f64,
                dx in -0.05..0.05_f64,
                dy in -0.05..0.05_f64,
                angle in 0.0..360.0_f64,
            ) {
                let pivot = Coord::new(lon, lat);
                let p = Coord::new(lon + dx, lat + dy);
                let back = rotate_coord(rotate_coord(p, angle, pivot), -angle, pivot);
                prop_assert!((back.lon - p.lon).abs() < 1e-9);
                prop_assert!((back.lat - p.lat).abs() < 1e-9);
            }

            #[test]
            fn test_point_at_distance_clamped(
                extra in 0.0..10_000.0_f64,
            ) {
                let line = LineString::new(vec![
                    Coord::new(10.0, 53.0),
                    Coord::new(10.01, 53.0),
                    Coord::new(10.01, 53.01),
                ]).unwrap();
                let len = line_length(&line, DistanceUnit::Meters);
                let end = point_at_distance(&line, len + extra, DistanceUnit::Meters);
                prop_assert_eq!(end, Coord::new(10.01, 53.01));
            }
        }
    }
}
