//! Arc-length parameterization of polylines.

use super::distance::{bearing, destination, distance};
use super::types::{Coord, DistanceUnit, LineString};

/// Total great-circle length of a line.
pub fn line_length(line: &LineString, units: DistanceUnit) -> f64 {
    line.coords()
        .windows(2)
        .map(|seg| distance(seg[0], seg[1], units))
        .sum()
}

/// Point at `dist` along a line, measured from its first vertex.
///
/// Distances past the end clamp to the last vertex; negative distances
/// clamp to the first. Within a segment the point is found by travelling
/// along the great circle from the segment start.
pub fn point_at_distance(line: &LineString, dist: f64, units: DistanceUnit) -> Coord {
    let coords = line.coords();
    let first = coords[0];
    if dist <= 0.0 {
        return first;
    }

    let mut travelled = 0.0;
    for seg in coords.windows(2) {
        let (start, end) = (seg[0], seg[1]);
        let seg_len = distance(start, end, units);
        if seg_len > 0.0 && dist < travelled + seg_len {
            return destination(start, dist - travelled, bearing(start, end), units);
        }
        travelled += seg_len;
    }

    coords[coords.len() - 1]
}
