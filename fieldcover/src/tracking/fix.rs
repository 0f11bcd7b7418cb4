//! Position fixes from a location provider.

use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// A single position report.
///
/// Accepts the common short field names (`lat`, `lon`, `accuracy`,
/// `timestamp`) when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Latitude in degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude in degrees.
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,

    /// Horizontal accuracy radius in meters (lower is better).
    #[serde(alias = "accuracy", alias = "accuracyMeters")]
    pub accuracy_meters: f64,

    /// Fix time in milliseconds (wall-clock or monotonic).
    #[serde(default, alias = "timestamp", alias = "timestampMillis")]
    pub timestamp_millis: i64,
}

impl PositionFix {
    /// Create a fix.
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64, timestamp_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            timestamp_millis,
        }
    }

    /// Create a fix at a coordinate.
    pub fn at(coord: Coord, accuracy_meters: f64, timestamp_millis: i64) -> Self {
        Self::new(coord.lat, coord.lon, accuracy_meters, timestamp_millis)
    }

    /// Fix location as a coordinate.
    pub fn coord(&self) -> Coord {
        Coord::new(self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_order() {
        let fix = PositionFix::new(53.5, 10.0, 5.0, 0);
        assert_eq!(fix.coord(), Coord::new(10.0, 53.5));
        assert_eq!(PositionFix::at(fix.coord(), 5.0, 0), fix);
    }

    #[test]
    fn test_deserialize_short_names() {
        let fix: PositionFix =
            serde_json::from_str(r#"{"lat": 53.5, "lon": 10.0, "accuracy": 8.5}"#).unwrap();
        assert_eq!(fix.latitude, 53.5);
        assert_eq!(fix.longitude, 10.0);
        assert_eq!(fix.accuracy_meters, 8.5);
        assert_eq!(fix.timestamp_millis, 0);
    }

    #[test]
    fn test_deserialize_full_names() {
        let fix: PositionFix = serde_json::from_str(
            r#"{"latitude": 1.0, "longitude": 2.0, "accuracy_meters": 3.0, "timestamp_millis": 42}"#,
        )
        .unwrap();
        assert_eq!(fix, PositionFix::new(1.0, 2.0, 3.0, 42));
    }
}
