//! FieldCover - coverage points and visit tracking for field surveys
//!
//! Lay out a set of points over a survey area, either as a regular grid or
//! along the road network, then track which of them a surveyor has come
//! close enough to while walking the area.
//!
//! - [`geometry`] - geodesic distance, bearings, rotation, point-in-polygon
//! - [`coverage`] - grid tessellation and road sampling
//! - [`roads`] - road network sources (Overpass API, static data)
//! - [`tracking`] - session state machine and proximity visits
//! - [`project`] - GeoJSON project documents
//! - [`config`] - `~/.fieldcover/config.ini`
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod coverage;
pub mod geometry;
pub mod logging;
pub mod project;
pub mod roads;
pub mod tracking;

/// Crate version, used in the HTTP user agent and CLI output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
