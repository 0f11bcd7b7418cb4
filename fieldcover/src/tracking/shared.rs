//! Thread-safe tracker handle with a session clock and visit events.
//!
//! A timer task and a location stream both mutate the session, so every
//! call goes through one mutex. Observers subscribe to a broadcast channel
//! instead of registering callbacks.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::error::TrackingError;
use super::fix::PositionFix;
use super::session::SessionStatus;
use super::tracker::{SessionSnapshot, Tracker};
use crate::coverage::CoverageSet;
use crate::geometry::Coord;

/// Session clock period.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Capacity of the event channel; slow subscribers see `Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notifications published by a [`SharedTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A pending point became visited.
    PointVisited { index: usize, coord: Coord },
    /// The session moved between statuses.
    StatusChanged {
        from: SessionStatus,
        to: SessionStatus,
    },
}

/// Cloneable handle to a mutex-guarded [`Tracker`].
#[derive(Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<Tracker>>,
    events: broadcast::Sender<TrackerEvent>,
}

impl SharedTracker {
    pub fn new(tracker: Tracker) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(tracker)),
            events,
        }
    }

    /// Receive events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.events.subscribe()
    }

    pub fn start(&self) -> Result<(), TrackingError> {
        self.transition(|t| t.start())
    }

    pub fn pause(&self) -> Result<(), TrackingError> {
        self.transition(|t| t.pause())
    }

    pub fn resume(&self) -> Result<(), TrackingError> {
        self.transition(|t| t.resume())
    }

    pub fn stop(&self) -> Result<(), TrackingError> {
        self.transition(|t| t.stop())
    }

    pub fn reset(&self) {
        let _ = self.transition(|t| {
            t.reset();
            Ok(())
        });
    }

    pub fn tick(&self) -> bool {
        self.inner.lock().tick()
    }

    /// Apply a fix and publish a [`TrackerEvent::PointVisited`] per new visit.
    pub fn update_position(&self, fix: &PositionFix) -> Vec<usize> {
        let mut tracker = self.inner.lock();
        let visited = tracker.update_position(fix);
        for &index in &visited {
            if let Some(point) = tracker.coverage().get(index) {
                let _ = self.events.send(TrackerEvent::PointVisited {
                    index,
                    coord: point.coord,
                });
            }
        }
        visited
    }

    /// Swap in a new generation; the session returns to Idle.
    pub fn replace_coverage(&self, coverage: CoverageSet) -> CoverageSet {
        let mut old = CoverageSet::empty();
        let _ = self.transition(|t| {
            old = t.replace_coverage(coverage);
            Ok(())
        });
        old
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with read access to the tracker.
    pub fn with_tracker<R>(&self, f: impl FnOnce(&Tracker) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Spawn the session clock, ticking every `period` until `cancellation`
    /// fires.
    ///
    /// The first tick happens one full period after spawning.
    pub fn spawn_ticker(&self, period: Duration, cancellation: CancellationToken) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(period_ms = period.as_millis() as u64, "Session ticker started");
            loop {
                tokio::select! {
                    biased;

                    _ = cancellation.cancelled() => break,

                    _ = interval.tick() => {
                        tracker.tick();
                    }
                }
            }
            tracing::debug!("Session ticker stopped");
        })
    }

    fn transition(
        &self,
        f: impl FnOnce(&mut Tracker) -> Result<(), TrackingError>,
    ) -> Result<(), TrackingError> {
        let mut tracker = self.inner.lock();
        let from = tracker.status();
        f(&mut *tracker)?;
        let to = tracker.status();
        if from != to {
            let _ = self.events.send(TrackerEvent::StatusChanged { from, to });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::TrackingConfig;

    fn shared() -> SharedTracker {
        let coverage = CoverageSet::from_coords(vec![
            Coord::new(10.0, 53.0),
            Coord::new(10.01, 53.0),
        ]);
        SharedTracker::new(Tracker::new(TrackingConfig::default(), coverage))
    }

    #[tokio::test]
    async fn test_events_for_transitions_and_visits() {
        let tracker = shared();
        let mut rx = tracker.subscribe();

        tracker.start().unwrap();
        let visited = tracker.update_position(&PositionFix::new(53.0, 10.01, 3.0, 0));
        assert_eq!(visited, vec![1]);
        tracker.stop().unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            TrackerEvent::StatusChanged {
                from: SessionStatus::Idle,
                to: SessionStatus::Running
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TrackerEvent::PointVisited {
                index: 1,
                coord: Coord::new(10.01, 53.0)
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            TrackerEvent::StatusChanged {
                from: SessionStatus::Running,
                to: SessionStatus::Finished
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_transition_publishes_nothing() {
        let tracker = shared();
        let mut rx = tracker.subscribe();
        assert!(tracker.pause().is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_counts_running_seconds() {
        let tracker = shared();
        tracker.start().unwrap();

        let cancel = CancellationToken::new();
        let handle = tracker.spawn_ticker(TICK_INTERVAL, cancel.clone());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(tracker.snapshot().elapsed_seconds, 3);

        tracker.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(tracker.snapshot().elapsed_seconds, 3);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_coverage_resets() {
        let tracker = shared();
        tracker.start().unwrap();
        tracker.update_position(&PositionFix::new(53.0, 10.0, 3.0, 0));

        let old = tracker.replace_coverage(CoverageSet::empty());
        assert_eq!(old.len(), 2);
        assert_eq!(tracker.snapshot().status, SessionStatus::Idle);
        assert_eq!(tracker.with_tracker(|t| t.coverage().len()), 0);
    }

    #[test]
    fn test_concurrent_fixes_and_ticks() {
        let tracker = shared();
        tracker.start().unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                let t = tracker.clone();
                s.spawn(move || {
                    for _ in 0..50 {
                        t.tick();
                        t.update_position(&PositionFix::new(53.0, 10.0, 3.0, 0));
                    }
                });
            }
        });

        let snap = tracker.snapshot();
        assert_eq!(snap.elapsed_seconds, 200);
        assert_eq!(snap.visited, 1);
    }
}
