//! Rotation of geometries about a pivot.
//!
//! Rotation happens in a local frame around the pivot where longitude
//! offsets are scaled by `cos(pivot latitude)`, so a square on the ground
//! stays a square after rotation. The map is linear, so rotating by θ and
//! then by -θ about the same pivot restores the input up to float error.

use super::types::{Coord, Polygon};

/// Smallest longitude scale used near the poles.
const MIN_LON_SCALE: f64 = 1e-12;

/// Rotate a single coordinate about `pivot`.
///
/// Positive angles rotate counter-clockwise.
#[inline]
pub fn rotate_coord(coord: Coord, angle_degrees: f64, pivot: Coord) -> Coord {
    Rotation::new(angle_degrees, pivot).apply(coord)
}

/// Rotate every coordinate of a slice about `pivot`.
pub fn rotate_coords(coords: &[Coord], angle_degrees: f64, pivot: Coord) -> Vec<Coord> {
    let rotation = Rotation::new(angle_degrees, pivot);
    coords.iter().map(|c| rotation.apply(*c)).collect()
}

/// Rotate a polygon about `pivot`, returning a new polygon.
///
/// A zero angle returns an equal copy.
pub fn rotate_polygon(polygon: &Polygon, angle_degrees: f64, pivot: Coord) -> Polygon {
    if angle_degrees == 0.0 {
        return polygon.clone();
    }
    let rotation = Rotation::new(angle_degrees, pivot);
    polygon.map_coords(|c| rotation.apply(c))
}

/// Precomputed rotation about a pivot.
#[derive(Debug, Clone, Copy)]
struct Rotation {
    pivot: Coord,
    sin: f64,
    cos: f64,
    lon_scale: f64,
}

impl Rotation {
    fn new(angle_degrees: f64, pivot: Coord) -> Self {
        let theta = angle_degrees.to_radians();
        Self {
            pivot,
            sin: theta.sin(),
            cos: theta.cos(),
            lon_scale: pivot.lat.to_radians().cos().abs().max(MIN_LON_SCALE),
        }
    }

    fn apply(&self, coord: Coord) -> Coord {
        let dx = (coord.lon - self.pivot.lon) * self.lon_scale;
        let dy = coord.lat - self.pivot.lat;
        let rx = dx * self.cos - dy * self.sin;
        let ry = dx * self.sin + dy * self.cos;
        Coord::new(self.pivot.lon + rx / self.lon_scale, self.pivot.lat + ry)
    }
}
