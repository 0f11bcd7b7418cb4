//! Polygon predicates and measures: containment, centroid, planar area.

use super::types::{Coord, Polygon};

/// Distance in degrees within which a point counts as lying on a ring edge.
///
/// Points on the boundary are treated as outside so that lattice points on
/// a shared edge are never counted twice. The tolerance absorbs floating
/// point noise from lattice stepping (about a hundredth of a millimetre).
pub const BOUNDARY_EPSILON_DEG: f64 = 1e-10;

/// Test whether a point lies strictly inside a polygon.
///
/// Uses ray casting over the exterior ring; holes are subtracted. Points on
/// any ring boundary (within [`BOUNDARY_EPSILON_DEG`]) are outside.
pub fn point_in_polygon(point: Coord, polygon: &Polygon) -> bool {
    if !point.is_finite() {
        return false;
    }
    if !polygon.bounding_box().contains(&point) {
        return false;
    }
    if polygon.rings().any(|ring| on_ring_boundary(point, ring)) {
        return false;
    }
    if !ring_contains(point, polygon.exterior()) {
        return false;
    }
    !polygon.holes().iter().any(|hole| ring_contains(point, hole))
}

/// Even-odd ray casting against one closed ring.
fn ring_contains(point: Coord, ring: &[Coord]) -> bool {
    let mut inside = false;
    for edge in ring.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let x_cross = a.lon + (point.lat - a.lat) / (b.lat - a.lat) * (b.lon - a.lon);
            if point.lon < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

fn on_ring_boundary(point: Coord, ring: &[Coord]) -> bool {
    ring.windows(2)
        .any(|edge| point_segment_distance_deg(point, edge[0], edge[1]) <= BOUNDARY_EPSILON_DEG)
}

/// Planar distance in degrees from a point to a segment.
pub(crate) fn point_segment_distance_deg(p: Coord, a: Coord, b: Coord) -> f64 {
    let (dx, dy) = (b.lon - a.lon, b.lat - a.lat);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.lon - a.lon) * dx + (p.lat - a.lat) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.lon + t * dx, a.lat + t * dy);
    ((p.lon - cx).powi(2) + (p.lat - cy).powi(2)).sqrt()
}

/// Arithmetic centroid of the exterior ring vertices.
///
/// The closing duplicate is excluded. This is the mean of the vertices, not
/// the area centroid; it is stable and cheap, which is what a rotation pivot
/// needs.
pub fn centroid(polygon: &Polygon) -> Coord {
    let ring = polygon.exterior();
    let open = &ring[..ring.len().saturating_sub(1)];
    if open.is_empty() {
        return Coord::default();
    }
    let n = open.len() as f64;
    let (sum_lon, sum_lat) = open
        .iter()
        .fold((0.0, 0.0), |(x, y), c| (x + c.lon, y + c.lat));
    Coord::new(sum_lon / n, sum_lat / n)
}

/// Signed shoelace area of a closed ring in the ring's own units.
///
/// Positive for counter-clockwise rings.
pub(crate) fn signed_ring_area(ring: &[Coord]) -> f64 {
    ring.windows(2)
        .map(|e| e[0].lon * e[1].lat - e[1].lon * e[0].lat)
        .sum::<f64>()
        / 2.0
}
