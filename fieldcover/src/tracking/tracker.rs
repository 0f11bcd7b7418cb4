//! Tracker façade owning the engine and the coverage set it updates.

use super::engine::{TrackingConfig, TrackingEngine};
use super::error::TrackingError;
use super::fix::PositionFix;
use super::session::{SessionStatus, TrackingSession};
use crate::coverage::CoverageSet;

/// Point-in-time view of a session for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub visited: usize,
    pub total: usize,
    pub elapsed_seconds: u64,
    pub started_at_millis: Option<i64>,
}

impl SessionSnapshot {
    /// Fraction of points visited in [0, 1]; 0 for an empty set.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.visited as f64 / self.total as f64
        }
    }

    /// Points still pending.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.visited)
    }
}

/// Owns one coverage set and one tracking session over it.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    engine: TrackingEngine,
    coverage: CoverageSet,
}

impl Tracker {
    /// Create an idle tracker over `coverage`.
    pub fn new(config: TrackingConfig, coverage: CoverageSet) -> Self {
        Self {
            engine: TrackingEngine::new(config),
            coverage,
        }
    }

    pub fn coverage(&self) -> &CoverageSet {
        &self.coverage
    }

    pub fn session(&self) -> &TrackingSession {
        self.engine.session()
    }

    pub fn config(&self) -> &TrackingConfig {
        self.engine.config()
    }

    pub fn status(&self) -> SessionStatus {
        self.engine.status()
    }

    pub fn start(&mut self) -> Result<(), TrackingError> {
        self.engine.start()
    }

    pub fn start_at(&mut self, now_millis: i64) -> Result<(), TrackingError> {
        self.engine.start_at(now_millis)
    }

    pub fn pause(&mut self) -> Result<(), TrackingError> {
        self.engine.pause()
    }

    pub fn resume(&mut self) -> Result<(), TrackingError> {
        self.engine.resume()
    }

    pub fn stop(&mut self) -> Result<(), TrackingError> {
        self.engine.stop()
    }

    /// Back to Idle and every point back to pending.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.coverage.reset_statuses();
    }

    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    /// Apply a fix; returns newly visited indices in ascending order.
    pub fn update_position(&mut self, fix: &PositionFix) -> Vec<usize> {
        self.engine.update_position(fix, &mut self.coverage)
    }

    /// Swap in a new generation and reset the session.
    ///
    /// Returns the previous coverage set.
    pub fn replace_coverage(&mut self, coverage: CoverageSet) -> CoverageSet {
        self.engine.reset();
        std::mem::replace(&mut self.coverage, coverage)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.engine.session();
        SessionSnapshot {
            status: session.status(),
            visited: self.coverage.visited_count(),
            total: self.coverage.len(),
            elapsed_seconds: session.elapsed_seconds(),
            started_at_millis: session.started_at_millis(),
        }
    }
}
