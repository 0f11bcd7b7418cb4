//! Error types for coverage generation.

use thiserror::Error;

use crate::roads::RoadDataError;

/// Errors that can occur while generating a coverage set.
///
/// Empty results (margin erased the polygon, no roads in the area) are
/// not errors; they come back as an empty [`super::CoverageSet`].
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Configuration rejected before any computation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Road data could not be fetched (network failure, timeout, bad
    /// response). Distinct from "zero roads found" so callers can retry.
    #[error("Road data unavailable: {0}")]
    RoadDataUnavailable(#[from] RoadDataError),
}

impl GenerationError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::RoadDataUnavailable(_))
    }
}
