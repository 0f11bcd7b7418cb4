//! Proximity tracking
//!
//! A session state machine consumes position fixes and flips coverage points
//! from pending to visited. Fixes whose reported accuracy is worse than the
//! configured ceiling never produce visits. A one-second clock counts
//! running time independently of fix arrival.
//!
//! # Example
//!
//! ```
//! use fieldcover::coverage::CoverageSet;
//! use fieldcover::geometry::Coord;
//! use fieldcover::tracking::{PositionFix, Tracker, TrackingConfig};
//!
//! let points = CoverageSet::from_coords(vec![Coord::new(10.0, 53.0)]);
//! let mut tracker = Tracker::new(TrackingConfig::default(), points);
//!
//! tracker.start().unwrap();
//! // Accuracy worse than the 25 m ceiling: ignored
//! assert!(tracker.update_position(&PositionFix::new(53.0, 10.0, 40.0, 0)).is_empty());
//! assert_eq!(tracker.update_position(&PositionFix::new(53.0, 10.0, 8.0, 1)), vec![0]);
//! ```

mod engine;
mod error;
mod fix;
mod session;
mod shared;
mod tracker;

pub use engine::{
    TrackingConfig, TrackingEngine, DEFAULT_ACCURACY_CEILING_METERS,
    DEFAULT_VISIT_THRESHOLD_METERS,
};
pub use error::TrackingError;
pub use fix::PositionFix;
pub use session::{SessionAction, SessionStatus, TrackingSession};
pub use shared::{SharedTracker, TrackerEvent, TICK_INTERVAL};
pub use tracker::{SessionSnapshot, Tracker};
