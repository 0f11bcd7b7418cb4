//! Tracking errors.

use thiserror::Error;

use super::session::{SessionAction, SessionStatus};

/// Errors from the tracking state machine.
///
/// A rejected fix is not an error: it is dropped and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// The requested action is not allowed from the current status.
    /// The session is left unchanged.
    #[error("Cannot {action} a session that is {from}")]
    InvalidTransition {
        from: SessionStatus,
        action: SessionAction,
    },
}
