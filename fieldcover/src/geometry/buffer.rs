//! Inward buffering (erosion) of polygons by a margin in meters.
//!
//! # Algorithm
//!
//! ```text
//! lon/lat ──► local meter frame ──► offset rings ──► filter ──► lon/lat
//!            (equirectangular      (convex: mitre   (drop vertices
//!             around centroid)      reflex: arc)     closer than margin)
//! ```
//!
//! Each ring is oriented so the region to keep lies on its left (exterior
//! counter-clockwise, holes clockwise) and every edge is shifted left by the
//! margin. Convex corners become the intersection of the two shifted edges;
//! reflex corners get a circular arc of the margin radius. When the margin
//! approaches the polygon's width the shifted edges cross over; those
//! vertices end up closer than the margin to the original boundary and are
//! discarded. Fewer than three surviving vertices, or a ring whose
//! orientation flipped, means the polygon was erased.

use super::distance::meters_per_degree;
use super::polygon::centroid;
use super::types::{Coord, Polygon};

/// Angular step used to approximate round joins (11.25°).
const ARC_STEP_RAD: f64 = std::f64::consts::PI / 16.0;

/// Relative tolerance when checking vertex clearance against the margin.
const CLEARANCE_TOLERANCE: f64 = 1e-6;

/// Squared length below which two projected vertices are the same point.
const DEGENERATE_EDGE_SQ_M: f64 = 1e-12;

/// Result of an inward buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffered {
    /// The shrunken polygon.
    Polygon(Polygon),
    /// The margin erased the polygon entirely.
    Empty,
}

impl Buffered {
    /// Whether the buffer erased the polygon.
    pub fn is_empty(&self) -> bool {
        matches!(self, Buffered::Empty)
    }

    /// The buffered polygon, if any.
    pub fn into_polygon(self) -> Option<Polygon> {
        match self {
            Buffered::Polygon(p) => Some(p),
            Buffered::Empty => None,
        }
    }
}

/// Shrink a polygon by `margin_meters`.
///
/// A non-positive margin returns an equal copy. Holes grow by the margin; a
/// grown hole that would reach the exterior is dropped rather than merged.
/// The input is assumed to be a simple polygon.
pub fn buffer_inward(polygon: &Polygon, margin_meters: f64) -> Buffered {
    if margin_meters.is_nan() || margin_meters <= 0.0 {
        return Buffered::Polygon(polygon.clone());
    }

    let frame = LocalFrame::new(centroid(polygon));
    let original: Vec<Vec<P>> = polygon.rings().map(|r| frame.project_ring(r)).collect();

    let Some(exterior) = offset_ring(&original[0], margin_meters, true, &original) else {
        return Buffered::Empty;
    };

    let holes: Vec<Vec<Coord>> = original[1..]
        .iter()
        .filter_map(|hole| offset_ring(hole, margin_meters, false, &original))
        .map(|ring| frame.unproject_ring(&ring))
        .collect();

    Buffered::Polygon(Polygon::from_valid_rings(
        frame.unproject_ring(&exterior),
        holes,
    ))
}

/// Point in the local meter frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct P {
    x: f64,
    y: f64,
}

impl P {
    fn sub(self, o: P) -> P {
        P {
            x: self.x - o.x,
            y: self.y - o.y,
        }
    }

    fn cross(self, o: P) -> f64 {
        self.x * o.y - self.y * o.x
    }

    fn dot(self, o: P) -> f64 {
        self.x * o.x + self.y * o.y
    }

    fn len_sq(self) -> f64 {
        self.dot(self)
    }

    /// Unit normal pointing to the left of this direction.
    fn left_normal(self) -> P {
        let len = self.len_sq().sqrt();
        P {
            x: -self.y / len,
            y: self.x / len,
        }
    }

    fn offset(self, dir: P, dist: f64) -> P {
        P {
            x: self.x + dir.x * dist,
            y: self.y + dir.y * dist,
        }
    }
}

/// Equirectangular projection around an origin, in meters.
#[derive(Debug, Clone, Copy)]
struct LocalFrame {
    origin: Coord,
    kx: f64,
    ky: f64,
}

impl LocalFrame {
    fn new(origin: Coord) -> Self {
        let ky = meters_per_degree();
        let kx = ky * origin.lat.to_radians().cos().abs().max(1e-12);
        Self { origin, kx, ky }
    }

    fn project(&self, c: Coord) -> P {
        P {
            x: (c.lon - self.origin.lon) * self.kx,
            y: (c.lat - self.origin.lat) * self.ky,
        }
    }

    fn unproject(&self, p: P) -> Coord {
        Coord::new(self.origin.lon + p.x / self.kx, self.origin.lat + p.y / self.ky)
    }

    /// Project a closed ring into an open ring without repeated vertices.
    fn project_ring(&self, ring: &[Coord]) -> Vec<P> {
        let mut out: Vec<P> = Vec::with_capacity(ring.len());
        for p in ring.iter().map(|c| self.project(*c)) {
            if out.last().is_some_and(|last| p.sub(*last).len_sq() < DEGENERATE_EDGE_SQ_M) {
                continue;
            }
            out.push(p);
        }
        while out.len() > 1 && out[0].sub(out[out.len() - 1]).len_sq() < DEGENERATE_EDGE_SQ_M {
            out.pop();
        }
        out
    }

    /// Unproject an open ring and close it.
    fn unproject_ring(&self, ring: &[P]) -> Vec<Coord> {
        let mut out: Vec<Coord> = ring.iter().map(|p| self.unproject(*p)).collect();
        if let Some(first) = out.first().copied() {
            out.push(first);
        }
        out
    }
}

fn signed_area(ring: &[P]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].cross(ring[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

/// Offset an open ring to the side that keeps the polygon interior.
///
/// `is_exterior` selects counter-clockwise (exterior) or clockwise (hole)
/// orientation before shifting left. Returns `None` when the ring collapses.
fn offset_ring(ring: &[P], margin: f64, is_exterior: bool, original: &[Vec<P>]) -> Option<Vec<P>> {
    if ring.len() < 3 {
        return None;
    }

    let mut oriented = ring.to_vec();
    let area = signed_area(&oriented);
    if (area > 0.0) != is_exterior {
        oriented.reverse();
    }

    let n = oriented.len();
    let mut shifted = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = oriented[(i + n - 1) % n];
        let here = oriented[i];
        let next = oriented[(i + 1) % n];

        let e_in = here.sub(prev);
        let e_out = next.sub(here);
        let n1 = e_in.left_normal();
        let n2 = e_out.left_normal();
        let turn = e_in.cross(e_out);
        let denom = 1.0 + n1.dot(n2);

        if turn > 0.0 && denom > 1e-9 {
            // Convex corner: intersection of the two shifted edges.
            let mitre = P {
                x: (n1.x + n2.x) / denom,
                y: (n1.y + n2.y) / denom,
            };
            shifted.push(here.offset(mitre, margin));
        } else if turn < 0.0 {
            // Reflex corner: arc of radius `margin` around the vertex.
            let a1 = n1.y.atan2(n1.x);
            let mut sweep = n2.y.atan2(n2.x) - a1;
            while sweep > 0.0 {
                sweep -= 2.0 * std::f64::consts::PI;
            }
            let steps = (sweep.abs() / ARC_STEP_RAD).ceil().max(1.0) as usize;
            for k in 0..=steps {
                let a = a1 + sweep * k as f64 / steps as f64;
                shifted.push(here.offset(P { x: a.cos(), y: a.sin() }, margin));
            }
        } else {
            shifted.push(here.offset(n1, margin));
            if denom <= 1e-9 {
                shifted.push(here.offset(n2, margin));
            }
        }
    }

    let min_clearance = margin * (1.0 - CLEARANCE_TOLERANCE);
    let kept: Vec<P> = shifted
        .into_iter()
        .filter(|p| clearance(*p, original) >= min_clearance && inside(*p, original))
        .collect();

    if kept.len() < 3 {
        return None;
    }
    let kept_area = signed_area(&kept);
    let orientation_ok = if is_exterior {
        kept_area > 0.0
    } else {
        kept_area < 0.0
    };
    if !orientation_ok || kept_area.abs() < DEGENERATE_EDGE_SQ_M {
        return None;
    }
    Some(kept)
}

/// Minimum distance from a point to any edge of the original rings.
fn clearance(p: P, rings: &[Vec<P>]) -> f64 {
    rings
        .iter()
        .flat_map(|ring| {
            let n = ring.len();
            (0..n).map(move |i| segment_distance(p, ring[i], ring[(i + 1) % n]))
        })
        .fold(f64::INFINITY, f64::min)
}

fn segment_distance(p: P, a: P, b: P) -> f64 {
    let ab = b.sub(a);
    let len_sq = ab.len_sq();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (p.sub(a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    p.sub(a.offset(ab, t)).len_sq().sqrt()
}

/// Even-odd containment against the original rings (holes subtract).
fn inside(p: P, rings: &[Vec<P>]) -> bool {
    let mut crossings = 0usize;
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    crossings += 1;
                }
            }
        }
    }
    crossings % 2 == 1
}
