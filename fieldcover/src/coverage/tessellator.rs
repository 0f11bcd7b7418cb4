//! Grid tessellation of a polygon.
//!
//! The lattice is always laid out axis-aligned. A rotated grid is produced by
//! de-rotating the polygon, generating and masking the lattice in that frame,
//! then rotating the survivors back about the same pivot.

use tracing::{debug, info};

use super::config::{GenerationConfig, GridPattern};
use super::error::GenerationError;
use super::types::CoverageSet;
use crate::geometry::{
    buffer_inward, centroid, distance, point_in_polygon, rotate_coords, rotate_polygon,
    BoundingBox, Buffered, Coord, DistanceUnit, Polygon,
};

/// Slack when counting how many steps fit in a span, so a span that is an
/// exact multiple of the step keeps its last lattice line.
const STEP_COUNT_SLACK: f64 = 1e-9;

/// Upper bound on lattice points considered before masking. Spacings that
/// are tiny relative to the area are rejected rather than allocated.
pub const MAX_CANDIDATES: usize = 5_000_000;

/// Generate a masked lattice of points covering `polygon`.
///
/// Returns an empty set when the margin erases the polygon. Output order is
/// column-then-row for both patterns, so identical inputs always produce
/// identical sets.
pub fn tessellate(
    polygon: &Polygon,
    config: &GenerationConfig,
) -> Result<CoverageSet, GenerationError> {
    config.validate()?;

    let search = if config.margin_meters > 0.0 {
        match buffer_inward(polygon, config.margin_meters) {
            Buffered::Polygon(p) => p,
            Buffered::Empty => {
                debug!(
                    margin_meters = config.margin_meters,
                    "Margin erased polygon, nothing to tessellate"
                );
                return Ok(CoverageSet::empty());
            }
        }
    } else {
        polygon.clone()
    };

    let rotation = config.rotation_degrees;
    let (working, pivot) = if rotation != 0.0 {
        let pivot = centroid(&search);
        (rotate_polygon(&search, -rotation, pivot), Some(pivot))
    } else {
        (search, None)
    };

    let bbox = working.bounding_box();
    let candidates = match config.pattern {
        GridPattern::Rectangular => rectangular_lattice(&bbox, config.spacing, config.units)?,
        GridPattern::Hexagonal => hexagonal_centres(&bbox, config.spacing, config.units)?,
    };
    let candidate_count = candidates.len();

    let inside: Vec<Coord> = candidates
        .into_iter()
        .filter(|c| point_in_polygon(*c, &working))
        .collect();

    let coords = match pivot {
        Some(pivot) => rotate_coords(&inside, rotation, pivot),
        None => inside,
    };

    info!(
        pattern = %config.pattern,
        spacing = config.spacing,
        units = config.units.suffix(),
        rotation_degrees = rotation,
        candidates = candidate_count,
        points = coords.len(),
        "Tessellated polygon"
    );

    Ok(CoverageSet::from_coords(coords))
}

/// Spacing expressed in degrees along each axis of `bbox`.
///
/// Each axis is scaled by the ratio of its degree span to its great-circle
/// length, measured along the box's south and west edges. Returns `None`
/// for a box with no extent on either axis.
fn cell_size_degrees(bbox: &BoundingBox, spacing: f64, units: DistanceUnit) -> Option<(f64, f64)> {
    let south_west = Coord::new(bbox.min_x, bbox.min_y);
    let width = distance(south_west, Coord::new(bbox.max_x, bbox.min_y), units);
    let height = distance(south_west, Coord::new(bbox.min_x, bbox.max_y), units);
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let cell_x = spacing / width * bbox.width();
    let cell_y = spacing / height * bbox.height();
    Some((cell_x, cell_y))
}

fn step_count(span: f64, step: f64) -> f64 {
    (span / step + STEP_COUNT_SLACK).floor().max(0.0)
}

/// Lattice extent `(columns, rows)` as step counts, checked against
/// [`MAX_CANDIDATES`] before anything is allocated.
fn lattice_extent(columns: f64, rows: f64) -> Result<(usize, usize), GenerationError> {
    let candidates = (columns + 1.0) * (rows + 1.0);
    if !candidates.is_finite() || candidates > MAX_CANDIDATES as f64 {
        return Err(GenerationError::InvalidConfig(format!(
            "spacing too small for this area: about {:.0} grid candidates, limit is {}",
            candidates, MAX_CANDIDATES
        )));
    }
    Ok((columns as usize, rows as usize))
}

fn rectangular_lattice(
    bbox: &BoundingBox,
    spacing: f64,
    units: DistanceUnit,
) -> Result<Vec<Coord>, GenerationError> {
    let Some((cell_x, cell_y)) = cell_size_degrees(bbox, spacing, units) else {
        return Ok(Vec::new());
    };

    let (columns, rows) = lattice_extent(
        step_count(bbox.width(), cell_x),
        step_count(bbox.height(), cell_y),
    )?;

    let mut out = Vec::with_capacity((columns + 1) * (rows + 1));
    for i in 0..=columns {
        let x = bbox.min_x + i as f64 * cell_x;
        for j in 0..=rows {
            out.push(Coord::new(x, bbox.min_y + j as f64 * cell_y));
        }
    }
    Ok(out)
}

/// Centres of flat-topped hexagons of vertex-to-vertex diameter `spacing`.
fn hexagonal_centres(
    bbox: &BoundingBox,
    spacing: f64,
    units: DistanceUnit,
) -> Result<Vec<Coord>, GenerationError> {
    let Some((diameter_x, diameter_y)) = cell_size_degrees(bbox, spacing, units) else {
        return Ok(Vec::new());
    };

    let column_step = 0.75 * diameter_x;
    let row_step = diameter_y * 3f64.sqrt() / 2.0;

    let x0 = bbox.min_x - diameter_x / 2.0;
    let y0 = bbox.min_y - row_step / 2.0;
    let (columns, rows) = lattice_extent(
        step_count(bbox.width() + diameter_x, column_step),
        step_count(bbox.height() + row_step, row_step),
    )?;

    let mut out = Vec::with_capacity((columns + 1) * (rows + 1));
    for i in 0..=columns {
        let x = x0 + i as f64 * column_step;
        let shift = if i % 2 == 1 { row_step / 2.0 } else { 0.0 };
        for j in 0..=rows {
            out.push(Coord::new(x, y0 + shift + j as f64 * row_step));
        }
    }
    Ok(out)
}
