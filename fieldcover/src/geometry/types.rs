//! Core geometry types: coordinates, rings, polygons, lines and boxes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing geometries from raw coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A ring needs at least four coordinates (three distinct + closing).
    #[error("Ring has {count} coordinates (minimum 4)")]
    RingTooShort { count: usize },

    /// First and last coordinate of a ring differ.
    #[error("Ring is not closed: first {first} != last {last}")]
    RingNotClosed { first: Coord, last: Coord },

    /// A line needs at least two coordinates.
    #[error("Line has {count} coordinates (minimum 2)")]
    LineTooShort { count: usize },

    /// NaN or infinite coordinate value.
    #[error("Non-finite coordinate: {0}")]
    NonFinite(Coord),
}

/// Unit for distances passed to and returned by the kernel.
///
/// Every distance-bearing operation takes the unit explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Meters.
    Meters,
    /// Kilometers.
    #[default]
    Kilometers,
}

impl DistanceUnit {
    /// Number of meters in one unit.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
        }
    }

    /// Convert a value in this unit to meters.
    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    /// Convert a value in meters to this unit.
    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    /// Short suffix used in config files and CLI output.
    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
        }
    }

    /// Parse from config/CLI strings (`m`, `meters`, `km`, `kilometers`).
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Some(DistanceUnit::Meters),
            "km" | "kilometer" | "kilometers" => Some(DistanceUnit::Kilometers),
            _ => None,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A geographic coordinate (longitude, latitude) in degrees.
///
/// Field order follows GeoJSON: `x` is longitude, `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coord {
    /// Create a coordinate from longitude and latitude.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// GeoJSON position `[lon, lat]`.
    #[inline]
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for Coord {
    fn from(position: [f64; 2]) -> Self {
        Self::new(position[0], position[1])
    }
}

impl From<Coord> for [f64; 2] {
    fn from(coord: Coord) -> Self {
        coord.to_position()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum longitude (west).
    pub min_x: f64,
    /// Minimum latitude (south).
    pub min_y: f64,
    /// Maximum longitude (east).
    pub max_x: f64,
    /// Maximum latitude (north).
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounding box of a coordinate sequence, `None` when empty.
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.lon, first.lat, first.lon, first.lat);
        for c in iter {
            bbox.min_x = bbox.min_x.min(c.lon);
            bbox.min_y = bbox.min_y.min(c.lat);
            bbox.max_x = bbox.max_x.max(c.lon);
            bbox.max_y = bbox.max_y.max(c.lat);
        }
        Some(bbox)
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Centre of the box.
    pub fn center(&self) -> Coord {
        Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether two boxes overlap (touching edges count).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Whether a coordinate lies inside or on the box.
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.lon >= self.min_x
            && coord.lon <= self.max_x
            && coord.lat >= self.min_y
            && coord.lat <= self.max_y
    }

    /// `[min_x, min_y, max_x, max_y]`, the GeoJSON bbox order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// An ordered polyline with at least two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    coords: Vec<Coord>,
}

impl LineString {
    /// Create a line, validating length and finiteness.
    pub fn new(coords: Vec<Coord>) -> Result<Self, GeometryError> {
        if coords.len() < 2 {
            return Err(GeometryError::LineTooShort {
                count: coords.len(),
            });
        }
        if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
            return Err(GeometryError::NonFinite(*bad));
        }
        Ok(Self { coords })
    }

    /// The line's vertices.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Bounding box of the vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        // Construction guarantees at least two vertices.
        BoundingBox::from_coords(&self.coords).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }
}

/// A simple polygon: one closed exterior ring and optional closed holes.
///
/// Topology (self-intersection) is not validated; callers must supply
/// simple rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<Coord>,
    holes: Vec<Vec<Coord>>,
}

impl Polygon {
    /// Create a polygon from closed rings.
    pub fn new(exterior: Vec<Coord>, holes: Vec<Vec<Coord>>) -> Result<Self, GeometryError> {
        validate_ring(&exterior)?;
        for hole in &holes {
            validate_ring(hole)?;
        }
        Ok(Self { exterior, holes })
    }

    /// Create a polygon without holes from a ring that may be open.
    ///
    /// The closing coordinate is appended when missing.
    pub fn from_ring(mut ring: Vec<Coord>) -> Result<Self, GeometryError> {
        close_ring(&mut ring);
        Self::new(ring, Vec::new())
    }

    /// Build a polygon from GeoJSON-style positions (`[[[lon, lat], ...], ...]`).
    pub fn from_positions(rings: &[Vec<[f64; 2]>]) -> Result<Self, GeometryError> {
        let mut iter = rings.iter().map(|r| r.iter().copied().map(Coord::from).collect());
        let exterior: Vec<Coord> = iter.next().unwrap_or_default();
        Self::new(exterior, iter.collect())
    }

    /// GeoJSON-style positions, exterior first.
    pub fn to_positions(&self) -> Vec<Vec<[f64; 2]>> {
        self.rings()
            .map(|ring| ring.iter().map(|c| c.to_position()).collect())
            .collect()
    }

    /// Exterior ring, closed.
    pub fn exterior(&self) -> &[Coord] {
        &self.exterior
    }

    /// Hole rings, closed.
    pub fn holes(&self) -> &[Vec<Coord>] {
        &self.holes
    }

    /// Exterior followed by holes.
    pub fn rings(&self) -> impl Iterator<Item = &[Coord]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(|h| h.as_slice()))
    }

    /// Apply a coordinate transform to every vertex, producing a new polygon.
    ///
    /// Ring closure is preserved because the first and last vertex map to
    /// the same output.
    pub fn map_coords<F>(&self, mut f: F) -> Polygon
    where
        F: FnMut(Coord) -> Coord,
    {
        Polygon {
            exterior: self.exterior.iter().map(|c| f(*c)).collect(),
            holes: self
                .holes
                .iter()
                .map(|h| h.iter().map(|c| f(*c)).collect())
                .collect(),
        }
    }

    /// Bounding box of the exterior ring.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_coords(&self.exterior).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Crate-internal constructor for rings already known to be valid.
    pub(crate) fn from_valid_rings(exterior: Vec<Coord>, holes: Vec<Vec<Coord>>) -> Self {
        Self { exterior, holes }
    }
}

fn validate_ring(ring: &[Coord]) -> Result<(), GeometryError> {
    if ring.len() < 4 {
        return Err(GeometryError::RingTooShort { count: ring.len() });
    }
    if let Some(bad) = ring.iter().find(|c| !c.is_finite()) {
        return Err(GeometryError::NonFinite(*bad));
    }
    let first = ring[0];
    let last = ring[ring.len() - 1];
    if first != last {
        return Err(GeometryError::RingNotClosed { first, last });
    }
    Ok(())
}

/// Append the first coordinate if the ring is open.
pub(crate) fn close_ring(ring: &mut Vec<Coord>) {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_polygon_accepts_closed_ring() {
        let polygon = Polygon::new(square(), vec![]).unwrap();
        assert_eq!(polygon.exterior().len(), 5);
        assert!(polygon.holes().is_empty());
    }

    #[test]
    fn test_polygon_rejects_short_ring() {
        let ring = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(0.0, 0.0)];
        assert_eq!(
            Polygon::new(ring, vec![]).unwrap_err(),
            GeometryError::RingTooShort { count: 3 }
        );
    }

    #[test]
    fn test_polygon_rejects_open_ring() {
        let mut ring = square();
        ring.pop();
        ring.push(Coord::new(0.5, 0.5));
        assert!(matches!(
            Polygon::new(ring, vec![]),
            Err(GeometryError::RingNotClosed { .. })
        ));
    }

    #[test]
    fn test_polygon_rejects_non_finite() {
        let mut ring = square();
        ring[2] = Coord::new(f64::NAN, 1.0);
        assert!(matches!(
            Polygon::new(ring, vec![]),
            Err(GeometryError::NonFinite(_))
        ));
    }

    #[test]
    fn test_from_ring_closes_open_ring() {
        let mut ring = square();
        ring.pop();
        let polygon = Polygon::from_ring(ring).unwrap();
        assert_eq!(polygon.exterior().first(), polygon.exterior().last());
    }

    #[test]
    fn test_positions_roundtrip() {
        let polygon = Polygon::new(square(), vec![]).unwrap();
        let back = Polygon::from_positions(&polygon.to_positions()).unwrap();
        assert_eq!(polygon, back);
    }

    #[test]
    fn test_bounding_box() {
        let polygon = Polygon::new(square(), vec![]).unwrap();
        let bbox = polygon.bounding_box();
        assert_eq!(bbox.to_array(), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(bbox.center(), Coord::new(0.5, 0.5));
    }

    #[test]
    fn test_bounding_box_empty() {
        assert!(BoundingBox::from_coords(&[]).is_none());
    }

    #[test]
    fn test_bounding_box_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(1.0, 1.0, 2.0, 2.0);
        let c = BoundingBox::new(1.5, 1.5, 2.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_line_requires_two_coords() {
        assert_eq!(
            LineString::new(vec![Coord::new(0.0, 0.0)]).unwrap_err(),
            GeometryError::LineTooShort { count: 1 }
        );
    }

    #[test]
    fn test_distance_unit_conversion() {
        assert_eq!(DistanceUnit::Kilometers.to_meters(1.5), 1500.0);
        assert_eq!(DistanceUnit::Meters.from_meters(42.0), 42.0);
        assert_eq!(DistanceUnit::from_config_str("KM"), Some(DistanceUnit::Kilometers));
        assert_eq!(DistanceUnit::from_config_str("furlong"), None);
    }
}
