//! Coverage points and the coverage set produced by one generation.

use std::fmt;

use crate::geometry::{BoundingBox, Coord};

/// Visit status of a coverage point.
///
/// Transitions are one-way: `Pending` → `Visited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointStatus {
    /// Not yet visited.
    #[default]
    Pending,
    /// Visited by a position fix during tracking.
    Visited,
}

impl PointStatus {
    /// Whether the point still needs a visit.
    pub fn is_pending(&self) -> bool {
        matches!(self, PointStatus::Pending)
    }
}

impl fmt::Display for PointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointStatus::Pending => write!(f, "pending"),
            PointStatus::Visited => write!(f, "visited"),
        }
    }
}

/// One sample location the operator must physically visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoveragePoint {
    /// Stable index, assigned in generation order.
    pub index: usize,
    /// Location.
    pub coord: Coord,
    /// Visit status.
    pub status: PointStatus,
}

/// Ordered coverage points from a single generation call.
///
/// Index `i` always denotes the same point for the lifetime of the set.
/// Only the status of a point can change, and only from pending to
/// visited. A new generation replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageSet {
    points: Vec<CoveragePoint>,
}

impl CoverageSet {
    /// An empty set (nothing to visit).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from coordinates in generation order, all pending.
    pub fn from_coords(coords: Vec<Coord>) -> Self {
        let points = coords
            .into_iter()
            .enumerate()
            .map(|(index, coord)| CoveragePoint {
                index,
                coord,
                status: PointStatus::Pending,
            })
            .collect();
        Self { points }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in index order.
    pub fn points(&self) -> &[CoveragePoint] {
        &self.points
    }

    /// Point by index.
    pub fn get(&self, index: usize) -> Option<&CoveragePoint> {
        self.points.get(index)
    }

    /// Coordinates in index order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.points.iter().map(|p| p.coord)
    }

    /// Points still pending.
    pub fn pending(&self) -> impl Iterator<Item = &CoveragePoint> {
        self.points.iter().filter(|p| p.status.is_pending())
    }

    /// Indices of visited points, ascending.
    pub fn visited_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .filter(|p| !p.status.is_pending())
            .map(|p| p.index)
            .collect()
    }

    /// Number of visited points.
    pub fn visited_count(&self) -> usize {
        self.points.iter().filter(|p| !p.status.is_pending()).count()
    }

    /// Mark a point visited.
    ///
    /// Returns `true` only when the point existed and was pending.
    pub fn mark_visited(&mut self, index: usize) -> bool {
        match self.points.get_mut(index) {
            Some(point) if point.status.is_pending() => {
                point.status = PointStatus::Visited;
                true
            }
            _ => false,
        }
    }

    /// Return every point to pending.
    ///
    /// Used when a tracking session is explicitly reset; it never happens as
    /// part of tracking itself.
    pub fn reset_statuses(&mut self) {
        for point in &mut self.points {
            point.status = PointStatus::Pending;
        }
    }

    /// Bounding box of all points, `None` when empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let coords: Vec<Coord> = self.coords().collect();
        BoundingBox::from_coords(&coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> CoverageSet {
        CoverageSet::from_coords(vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
        ])
    }

    #[test]
    fn test_indices_follow_order() {
        let set = three();
        for (i, p) in set.points().iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.status, PointStatus::Pending);
        }
        assert_eq!(set.get(2).unwrap().coord, Coord::new(2.0, 0.0));
    }

    #[test]
    fn test_mark_visited_once() {
        let mut set = three();
        assert!(set.mark_visited(1));
        assert!(!set.mark_visited(1), "second mark is a no-op");
        assert!(!set.mark_visited(99), "unknown index is ignored");
        assert_eq!(set.visited_indices(), vec![1]);
        assert_eq!(set.visited_count(), 1);
        assert_eq!(set.pending().count(), 2);
    }

    #[test]
    fn test_reset_statuses() {
        let mut set = three();
        set.mark_visited(0);
        set.mark_visited(2);
        set.reset_statuses();
        assert_eq!(set.visited_count(), 0);
    }

    #[test]
    fn test_empty_set() {
        let set = CoverageSet::empty();
        assert!(set.is_empty());
        assert!(set.bounding_box().is_none());
    }
}
