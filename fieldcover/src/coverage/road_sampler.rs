//! Point sampling along a road network.

use rayon::prelude::*;
use tracing::info;

use super::config::{validate_spacing, ROAD_MIN_SEPARATION_FACTOR};
use super::error::GenerationError;
use super::types::CoverageSet;
use crate::geometry::{distance, line_length, point_at_distance, point_in_polygon, Coord, DistanceUnit, Polygon};
use crate::roads::RoadSegment;

/// Sample points every `spacing` along each road, keeping those inside
/// `polygon`.
///
/// A sample closer than `0.8 * spacing` to any previously accepted sample
/// (on any road) is dropped. Candidates for each road are computed in
/// parallel; acceptance runs serially in road order, then distance order,
/// so the result is reproducible.
pub fn sample_along_roads(
    polygon: &Polygon,
    roads: &[RoadSegment],
    spacing: f64,
    units: DistanceUnit,
) -> Result<CoverageSet, GenerationError> {
    validate_spacing(spacing)?;

    let bbox = polygon.bounding_box();
    let candidates: Vec<Vec<Coord>> = roads
        .par_iter()
        .map(|road| {
            if !road.bounding_box().intersects(&bbox) {
                return Vec::new();
            }
            road_candidates(road, polygon, spacing, units)
        })
        .collect();

    let min_separation = spacing * ROAD_MIN_SEPARATION_FACTOR;
    let mut accepted: Vec<Coord> = Vec::new();
    let mut rejected = 0usize;
    for candidate in candidates.into_iter().flatten() {
        let too_close = accepted
            .iter()
            .any(|p| distance(candidate, *p, units) < min_separation);
        if too_close {
            rejected += 1;
        } else {
            accepted.push(candidate);
        }
    }

    info!(
        roads = roads.len(),
        spacing,
        units = units.suffix(),
        rejected_near_duplicates = rejected,
        points = accepted.len(),
        "Sampled points along roads"
    );

    Ok(CoverageSet::from_coords(accepted))
}

/// Samples at 0, s, 2s, ... strictly below the road length, inside the polygon.
fn road_candidates(road: &RoadSegment, polygon: &Polygon, spacing: f64, units: DistanceUnit) -> Vec<Coord> {
    let length = line_length(&road.line, units);
    let mut out = Vec::new();
    let mut step = 0u64;
    loop {
        let at = step as f64 * spacing;
        if at >= length {
            break;
        }
        let p = point_at_distance(&road.line, at, units);
        if point_in_polygon(p, polygon) {
            out.push(p);
        }
        step += 1;
    }
    out
}
