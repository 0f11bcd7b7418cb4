//! Tracking session state machine.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//! Running|Paused --stop--> Finished
//! any --reset--> Idle (history cleared)
//! ```

use std::collections::BTreeSet;
use std::fmt;

use tracing::info;

use super::error::TrackingError;

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    /// No session in progress.
    #[default]
    Idle,
    /// Consuming fixes and counting time.
    Running,
    /// Suspended; fixes ignored, clock stopped.
    Paused,
    /// Ended; only `reset` leaves this state.
    Finished,
}

impl SessionStatus {
    /// Lowercase name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guarded lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Stop,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionAction::Start => "start",
            SessionAction::Pause => "pause",
            SessionAction::Resume => "resume",
            SessionAction::Stop => "stop",
        };
        f.write_str(s)
    }
}

/// State of one tracking session.
///
/// `visited` survives `start` from Idle; only [`TrackingSession::reset`]
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingSession {
    status: SessionStatus,
    visited: BTreeSet<usize>,
    started_at_millis: Option<i64>,
    elapsed_seconds: u64,
}

impl TrackingSession {
    /// A fresh idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether fixes and ticks are currently applied.
    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Indices visited in this session, ascending.
    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    /// When the session was last started, in milliseconds.
    pub fn started_at_millis(&self) -> Option<i64> {
        self.started_at_millis
    }

    /// Seconds spent running.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Idle → Running, stamped with the current wall-clock time.
    pub fn start(&mut self) -> Result<(), TrackingError> {
        self.start_at(chrono::Utc::now().timestamp_millis())
    }

    /// Idle → Running with an explicit start time.
    pub fn start_at(&mut self, now_millis: i64) -> Result<(), TrackingError> {
        self.transition(SessionAction::Start, SessionStatus::Idle, SessionStatus::Running)?;
        self.started_at_millis = Some(now_millis);
        Ok(())
    }

    /// Running → Paused.
    pub fn pause(&mut self) -> Result<(), TrackingError> {
        self.transition(SessionAction::Pause, SessionStatus::Running, SessionStatus::Paused)
    }

    /// Paused → Running.
    pub fn resume(&mut self) -> Result<(), TrackingError> {
        self.transition(SessionAction::Resume, SessionStatus::Paused, SessionStatus::Running)
    }

    /// Running or Paused → Finished.
    pub fn stop(&mut self) -> Result<(), TrackingError> {
        match self.status {
            SessionStatus::Running | SessionStatus::Paused => {
                self.set_status(SessionStatus::Finished);
                Ok(())
            }
            from => Err(TrackingError::InvalidTransition {
                from,
                action: SessionAction::Stop,
            }),
        }
    }

    /// Any → Idle, clearing history, start time and elapsed time.
    pub fn reset(&mut self) {
        info!(
            from = %self.status,
            visited = self.visited.len(),
            elapsed_seconds = self.elapsed_seconds,
            "Tracking session reset"
        );
        *self = Self::default();
    }

    /// Advance the clock by one second if running.
    pub fn tick(&mut self) -> bool {
        if self.is_running() {
            self.elapsed_seconds += 1;
            true
        } else {
            false
        }
    }

    /// Record a visit. Returns `false` if already recorded.
    pub(crate) fn record_visit(&mut self, index: usize) -> bool {
        self.visited.insert(index)
    }

    fn transition(
        &mut self,
        action: SessionAction,
        expected: SessionStatus,
        next: SessionStatus,
    ) -> Result<(), TrackingError> {
        if self.status != expected {
            return Err(TrackingError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        self.set_status(next);
        Ok(())
    }

    fn set_status(&mut self, next: SessionStatus) {
        info!(from = %self.status, to = %next, "Tracking session transition");
        self.status = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle() {
        let mut s = TrackingSession::new();
        assert_eq!(s.status(), SessionStatus::Idle);

        s.start_at(1_000).unwrap();
        assert_eq!(s.status(), SessionStatus::Running);
        assert_eq!(s.started_at_millis(), Some(1_000));

        s.pause().unwrap();
        assert_eq!(s.status(), SessionStatus::Paused);
        s.resume().unwrap();
        assert_eq!(s.status(), SessionStatus::Running);
        s.stop().unwrap();
        assert_eq!(s.status(), SessionStatus::Finished);
    }

    #[test]
    fn test_stop_from_paused() {
        let mut s = TrackingSession::new();
        s.start_at(0).unwrap();
        s.pause().unwrap();
        assert!(s.stop().is_ok());
    }

    #[test]
    fn test_invalid_transitions_leave_state_unchanged() {
        let mut s = TrackingSession::new();
        assert_eq!(
            s.pause(),
            Err(TrackingError::InvalidTransition {
                from: SessionStatus::Idle,
                action: SessionAction::Pause,
            })
        );
        assert!(s.resume().is_err());
        assert!(s.stop().is_err());
        assert_eq!(s, TrackingSession::new());

        s.start_at(5).unwrap();
        assert!(s.start_at(6).is_err());
        assert_eq!(s.started_at_millis(), Some(5));
        assert!(s.resume().is_err());

        s.stop().unwrap();
        for result in [s.start_at(7), s.pause(), s.resume(), s.stop()] {
            assert!(result.is_err());
        }
        assert_eq!(s.status(), SessionStatus::Finished);
    }

    #[test]
    fn test_tick_only_while_running() {
        let mut s = TrackingSession::new();
        assert!(!s.tick());
        s.start_at(0).unwrap();
        assert!(s.tick());
        assert!(s.tick());
        s.pause().unwrap();
        assert!(!s.tick());
        s.resume().unwrap();
        assert!(s.tick());
        s.stop().unwrap();
        assert!(!s.tick());
        assert_eq!(s.elapsed_seconds(), 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = TrackingSession::new();
        s.start_at(10).unwrap();
        s.tick();
        s.record_visit(4);
        s.stop().unwrap();

        s.reset();
        assert_eq!(s, TrackingSession::new());
    }

    #[test]
    fn test_restart_after_reset_has_empty_history() {
        let mut s = TrackingSession::new();
        s.start_at(0).unwrap();
        assert!(s.record_visit(2));
        assert!(!s.record_visit(2));
        s.stop().unwrap();
        s.reset();
        s.start_at(1).unwrap();
        assert!(s.visited().is_empty());
    }
}
