//! Proximity tracking engine.

use tracing::debug;

use super::error::TrackingError;
use super::fix::PositionFix;
use super::session::{SessionStatus, TrackingSession};
use crate::coverage::CoverageSet;
use crate::geometry::distance_meters;

/// Default radius within which a point counts as visited.
pub const DEFAULT_VISIT_THRESHOLD_METERS: f64 = 15.0;

/// Default worst accuracy a fix may report and still produce visits.
pub const DEFAULT_ACCURACY_CEILING_METERS: f64 = 25.0;

/// Visit rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    /// A pending point at most this far from a fix is visited (inclusive).
    pub visit_threshold_meters: f64,
    /// Fixes reporting accuracy worse than this are dropped (inclusive
    /// ceiling: equal accuracy is accepted).
    pub accuracy_ceiling_meters: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            visit_threshold_meters: DEFAULT_VISIT_THRESHOLD_METERS,
            accuracy_ceiling_meters: DEFAULT_ACCURACY_CEILING_METERS,
        }
    }
}

impl TrackingConfig {
    /// Set the visit threshold.
    pub fn with_visit_threshold(mut self, meters: f64) -> Self {
        self.visit_threshold_meters = meters;
        self
    }

    /// Set the accuracy ceiling.
    pub fn with_accuracy_ceiling(mut self, meters: f64) -> Self {
        self.accuracy_ceiling_meters = meters;
        self
    }
}

/// Session state machine plus visit rules.
///
/// Not internally synchronized; wrap in a mutex (see
/// [`super::SharedTracker`]) when ticks and fixes arrive from different
/// tasks.
#[derive(Debug, Clone, Default)]
pub struct TrackingEngine {
    config: TrackingConfig,
    session: TrackingSession,
}

impl TrackingEngine {
    /// Create an idle engine.
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            session: TrackingSession::new(),
        }
    }

    /// Visit rules in effect.
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Current session.
    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn start(&mut self) -> Result<(), TrackingError> {
        self.session.start()
    }

    pub fn start_at(&mut self, now_millis: i64) -> Result<(), TrackingError> {
        self.session.start_at(now_millis)
    }

    pub fn pause(&mut self) -> Result<(), TrackingError> {
        self.session.pause()
    }

    pub fn resume(&mut self) -> Result<(), TrackingError> {
        self.session.resume()
    }

    pub fn stop(&mut self) -> Result<(), TrackingError> {
        self.session.stop()
    }

    /// Back to Idle with an empty history. Point statuses are not touched.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// One-second clock tick; returns whether time advanced.
    pub fn tick(&mut self) -> bool {
        self.session.tick()
    }

    /// Apply a fix to `coverage`.
    ///
    /// Returns the indices newly visited by this fix, ascending. Returns an
    /// empty list when not running or when the fix accuracy is above the
    /// ceiling. Already visited points are never reconsidered.
    pub fn update_position(&mut self, fix: &PositionFix, coverage: &mut CoverageSet) -> Vec<usize> {
        if !self.session.is_running() {
            debug!(status = %self.session.status(), "Fix ignored, session not running");
            return Vec::new();
        }

        // NaN accuracy fails this comparison and is rejected too
        let accurate_enough = fix.accuracy_meters <= self.config.accuracy_ceiling_meters;
        if !accurate_enough {
            debug!(
                accuracy_meters = fix.accuracy_meters,
                ceiling_meters = self.config.accuracy_ceiling_meters,
                "Stale fix rejected"
            );
            return Vec::new();
        }

        let here = fix.coord();
        let threshold = self.config.visit_threshold_meters;
        let hits: Vec<usize> = coverage
            .pending()
            .filter(|p| distance_meters(here, p.coord) <= threshold)
            .map(|p| p.index)
            .collect();

        for &index in &hits {
            coverage.mark_visited(index);
            self.session.record_visit(index);
        }

        debug!(
            lat = fix.latitude,
            lon = fix.longitude,
            accuracy_meters = fix.accuracy_meters,
            newly_visited = hits.len(),
            "Fix applied"
        );

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::PointStatus;
    use crate::geometry::{destination, Coord, DistanceUnit};

    fn line_of_points() -> CoverageSet {
        // Five points 100 m apart heading east
        let origin = Coord::new(10.0, 53.0);
        CoverageSet::from_coords(
            (0..5)
                .map(|i| destination(origin, 100.0 * i as f64, 90.0, DistanceUnit::Meters))
                .collect(),
        )
    }

    fn running() -> TrackingEngine {
        let mut engine = TrackingEngine::default();
        engine.start_at(0).unwrap();
        engine
    }

    fn near(set: &CoverageSet, index: usize, offset_m: f64, accuracy: f64) -> PositionFix {
        let c = destination(set.points()[index].coord, offset_m, 0.0, DistanceUnit::Meters);
        PositionFix::at(c, accuracy, 0)
    }

    #[test]
    fn test_default_config() {
        let config = TrackingConfig::default();
        assert_eq!(config.visit_threshold_meters, 15.0);
        assert_eq!(config.accuracy_ceiling_meters, 25.0);
    }

    #[test]
    fn test_poor_accuracy_then_good_accuracy() {
        let mut set = line_of_points();
        let mut engine = running();

        assert!(engine.update_position(&near(&set, 3, 5.0, 30.0), &mut set).is_empty());
        assert_eq!(set.visited_count(), 0);

        assert_eq!(engine.update_position(&near(&set, 3, 5.0, 20.0), &mut set), vec![3]);
        assert_eq!(set.get(3).unwrap().status, PointStatus::Visited);
        assert!(engine.session().visited().contains(&3));
    }

    #[test]
    fn test_accuracy_ceiling_inclusive() {
        let mut set = line_of_points();
        let mut engine = running();
        assert_eq!(engine.update_position(&near(&set, 0, 0.0, 25.0), &mut set), vec![0]);
    }

    #[test]
    fn test_nan_accuracy_rejected() {
        let mut set = line_of_points();
        let mut engine = running();
        assert!(engine.update_position(&near(&set, 0, 0.0, f64::NAN), &mut set).is_empty());
    }

    #[test]
    fn test_threshold_boundary() {
        let mut set = line_of_points();
        let mut engine = running();
        assert!(engine.update_position(&near(&set, 1, 15.5, 5.0), &mut set).is_empty());
        assert_eq!(engine.update_position(&near(&set, 1, 14.5, 5.0), &mut set), vec![1]);
    }

    #[test]
    fn test_no_visits_unless_running() {
        let mut set = line_of_points();
        let mut engine = TrackingEngine::default();
        let fix = near(&set, 0, 0.0, 5.0);
        assert!(engine.update_position(&fix, &mut set).is_empty());

        engine.start_at(0).unwrap();
        engine.pause().unwrap();
        assert!(engine.update_position(&fix, &mut set).is_empty());

        engine.resume().unwrap();
        engine.stop().unwrap();
        assert!(engine.update_position(&fix, &mut set).is_empty());
        assert_eq!(set.visited_count(), 0);
    }

    #[test]
    fn test_repeated_fix_is_idempotent() {
        let mut set = line_of_points();
        let mut engine = running();
        let fix = near(&set, 2, 0.0, 5.0);
        assert_eq!(engine.update_position(&fix, &mut set), vec![2]);
        assert!(engine.update_position(&fix, &mut set).is_empty());
        assert_eq!(engine.session().visited().len(), 1);
    }

    #[test]
    fn test_wide_threshold_visits_several_in_order() {
        let mut set = line_of_points();
        let mut engine = TrackingEngine::new(TrackingConfig::default().with_visit_threshold(120.0));
        engine.start_at(0).unwrap();
        let fix = near(&set, 2, 0.0, 5.0);
        assert_eq!(engine.update_position(&fix, &mut set), vec![1, 2, 3]);
    }

    #[test]
    fn test_reset_keeps_point_statuses() {
        let mut set = line_of_points();
        let mut engine = running();
        engine.update_position(&near(&set, 0, 0.0, 5.0), &mut set);
        engine.reset();
        assert!(engine.session().visited().is_empty());
        assert_eq!(set.visited_count(), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_accuracy_gate(
                accuracy in 25.0001..1000.0_f64,
                index in 0usize..5,
                offset in 0.0..10.0_f64,
            ) {
                let mut set = line_of_points();
                let mut engine = running();
                let fix = near(&set, index, offset, accuracy);
                prop_assert!(engine.update_position(&fix, &mut set).is_empty());
                prop_assert_eq!(set.visited_count(), 0);
            }

            #[test]
            fn test_visits_are_monotonic(
                fixes in prop::collection::vec((0usize..5, 0.0..40.0_f64, 0.0..40.0_f64), 1..30),
            ) {
                let mut set = line_of_points();
                let mut engine = running();
                let mut visited_so_far: Vec<usize> = Vec::new();
                for (index, offset, accuracy) in fixes {
                    engine.update_position(&near(&set, index, offset, accuracy), &mut set);
                    let now = set.visited_indices();
                    for v in &visited_so_far {
                        prop_assert!(now.contains(v));
                    }
                    visited_so_far = now;
                }
            }
        }
    }
}
