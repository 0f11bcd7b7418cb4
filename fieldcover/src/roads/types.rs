//! Road segments and road-data errors.

use thiserror::Error;

use crate::geometry::{BoundingBox, LineString};

/// Highway classes considered drivable.
pub const DRIVABLE_HIGHWAYS: &[&str] = &[
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "service",
    "track",
];

/// Whether an OSM `highway` tag names a drivable road class.
pub fn is_drivable(highway: &str) -> bool {
    DRIVABLE_HIGHWAYS.contains(&highway)
}

/// A road geometry with optional metadata, read-only to the sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Road centreline (at least two coordinates).
    pub line: LineString,
    /// Street name, if tagged.
    pub name: Option<String>,
    /// OSM highway class, if tagged.
    pub highway: Option<String>,
}

impl RoadSegment {
    /// Create an untagged road.
    pub fn new(line: LineString) -> Self {
        Self {
            line,
            name: None,
            highway: None,
        }
    }

    /// Set the street name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the highway class.
    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway = Some(highway.into());
        self
    }

    /// Bounding box of the road geometry.
    pub fn bounding_box(&self) -> BoundingBox {
        self.line.bounding_box()
    }
}

/// Failures fetching road data.
///
/// "No roads in the area" is never one of these; it is an empty list.
#[derive(Debug, Clone, Error)]
pub enum RoadDataError {
    /// Transport-level failure (DNS, connection, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// No answer within the allowed time.
    #[error("Road data request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Response body could not be interpreted.
    #[error("Malformed road data: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;

    #[test]
    fn test_drivable_classes() {
        assert!(is_drivable("residential"));
        assert!(is_drivable("track"));
        assert!(!is_drivable("footway"));
        assert!(!is_drivable("cycleway"));
        assert!(!is_drivable("Residential"));
    }

    #[test]
    fn test_segment_builder() {
        let line = LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(0.01, 0.01)]).unwrap();
        let road = RoadSegment::new(line)
            .with_name("Main Street")
            .with_highway("primary");
        assert_eq!(road.name.as_deref(), Some("Main Street"));
        assert_eq!(road.highway.as_deref(), Some("primary"));
        assert_eq!(road.bounding_box().to_array(), [0.0, 0.0, 0.01, 0.01]);
    }

    #[test]
    fn test_error_display() {
        let err = RoadDataError::Status {
            status: 504,
            url: "https://overpass-api.de/api/interpreter".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 504 from https://overpass-api.de/api/interpreter"
        );
        assert_eq!(
            RoadDataError::Timeout { timeout_secs: 25 }.to_string(),
            "Road data request timed out after 25s"
        );
    }
}
