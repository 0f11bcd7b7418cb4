//! Great-circle distance, bearing and destination on a spherical Earth.

use super::types::{Coord, DistanceUnit};

/// Mean Earth radius in meters (the value used by most web GIS tooling).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Haversine distance between two coordinates.
///
/// # Arguments
///
/// * `a` - Start coordinate
/// * `b` - End coordinate
/// * `units` - Unit of the returned distance
#[inline]
pub fn distance(a: Coord, b: Coord, units: DistanceUnit) -> f64 {
    units.from_meters(distance_meters(a, b))
}

/// Haversine distance in meters.
#[inline]
pub fn distance_meters(a: Coord, b: Coord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `a` to `b` in degrees (-180, 180].
///
/// 0 = north, 90 = east.
pub fn bearing(a: Coord, b: Coord) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees()
}

/// Point reached by travelling `dist` along a great circle from `origin`
/// with initial `bearing_deg`.
pub fn destination(origin: Coord, dist: f64, bearing_deg: f64, units: DistanceUnit) -> Coord {
    let angular = units.to_meters(dist) / EARTH_RADIUS_METERS;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coord::new(lon2.to_degrees(), lat2.to_degrees())
}

/// Length in meters of one degree of latitude.
#[inline]
pub fn meters_per_degree() -> f64 {
    EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0
}
