//! Minimal GeoJSON (RFC 7946) model.
//!
//! Covers the geometry types this crate reads and writes. Unsupported
//! geometry types deserialize to [`Geometry::Other`] so a foreign file does
//! not fail to load as a whole.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ProjectError;
use crate::geometry::{Coord, LineString, Polygon};
use crate::roads::RoadSegment;

/// A position; extra ordinates (altitude) are dropped on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position(pub Coord);

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, ..] => Ok(Position(Coord::new(*lon, *lat))),
            _ => Err(format!("position needs at least 2 numbers, got {}", values.len())),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(p: Position) -> Self {
        vec![p.0.lon, p.0.lat]
    }
}

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Other,
}

impl Geometry {
    pub fn point(coord: Coord) -> Self {
        Geometry::Point {
            coordinates: Position(coord),
        }
    }

    pub fn polygon(polygon: &Polygon) -> Self {
        Geometry::Polygon {
            coordinates: polygon
                .rings()
                .map(|ring| ring.iter().copied().map(Position).collect())
                .collect(),
        }
    }

    /// The polygon this geometry describes; the first member of a
    /// MultiPolygon. `None` for non-areal geometries.
    pub fn to_polygon(&self) -> Option<Result<Polygon, ProjectError>> {
        let rings = match self {
            Geometry::Polygon { coordinates } => coordinates,
            Geometry::MultiPolygon { coordinates } => coordinates.first()?,
            _ => return None,
        };
        Some(polygon_from_rings(rings))
    }

    /// Line geometries this geometry describes.
    pub fn to_lines(&self) -> Vec<Vec<Coord>> {
        let to_coords = |line: &Vec<Position>| line.iter().map(|p| p.0).collect();
        match self {
            Geometry::LineString { coordinates } => vec![to_coords(coordinates)],
            Geometry::MultiLineString { coordinates } => coordinates.iter().map(to_coords).collect(),
            _ => Vec::new(),
        }
    }
}

fn polygon_from_rings(rings: &[Vec<Position>]) -> Result<Polygon, ProjectError> {
    let mut rings = rings
        .iter()
        .map(|ring| ring.iter().map(|p| p.0).collect::<Vec<Coord>>());
    let exterior = rings.next().ok_or(ProjectError::MissingPolygon)?;
    let holes: Vec<Vec<Coord>> = rings.collect();
    // Tolerate unclosed rings from hand-written files
    let polygon = Polygon::from_ring(exterior)?;
    let mut closed_holes = Vec::with_capacity(holes.len());
    for hole in holes {
        closed_holes.push(Polygon::from_ring(hole)?.exterior().to_vec());
    }
    Ok(Polygon::new(polygon.exterior().to_vec(), closed_holes)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

/// GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    /// A property by key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

/// GeoJSON FeatureCollection with an optional top-level `properties`
/// foreign member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    tag: FeatureCollectionTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: FeatureCollectionTag::FeatureCollection,
            properties: None,
            features,
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Any GeoJSON document normalised to a list of features.
fn features_of(text: &str) -> Result<Vec<Feature>, ProjectError> {
    let value: Value = serde_json::from_str(text)?;
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => Ok(serde_json::from_value::<FeatureCollection>(value)?.features),
        Some("Feature") => Ok(vec![serde_json::from_value::<Feature>(value)?]),
        Some(_) => {
            let geometry: Geometry = serde_json::from_value(value)?;
            Ok(vec![Feature::new(geometry, Map::new())])
        }
        None => Err(ProjectError::InvalidDocument(
            "missing GeoJSON \"type\" member".to_string(),
        )),
    }
}

/// Read the first polygon from a FeatureCollection, Feature or bare
/// geometry.
pub fn parse_polygon(text: &str) -> Result<Polygon, ProjectError> {
    features_of(text)?
        .iter()
        .filter_map(|f| f.geometry.as_ref()?.to_polygon())
        .next()
        .unwrap_or(Err(ProjectError::MissingPolygon))
}

/// Read every LineString/MultiLineString as a road, keeping `name` and
/// `highway` properties. Lines with fewer than two positions are skipped.
pub fn parse_roads(text: &str) -> Result<Vec<RoadSegment>, ProjectError> {
    let mut roads = Vec::new();
    for feature in features_of(text)? {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let tag = |key: &str| feature.property(key).and_then(Value::as_str).map(String::from);
        for coords in geometry.to_lines() {
            let Ok(line) = LineString::new(coords) else {
                continue;
            };
            roads.push(RoadSegment {
                line,
                name: tag("name"),
                highway: tag("highway"),
            });
        }
    }
    Ok(roads)
}
