//! Project documents: polygon, settings and points as one GeoJSON file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ProjectError;
use super::geojson::{Feature, FeatureCollection, Geometry};
use crate::coverage::{CoverageSet, GenerationConfig, GridPattern, DEFAULT_SPACING};
use crate::geometry::{Coord, DistanceUnit, Polygon};

/// Name used when a document carries none and no file name is known.
pub const UNTITLED_PROJECT: &str = "Untitled";

/// Settings as stored in the `properties.settings` object.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    margin_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    use_roads: Option<bool>,
}

impl StoredSettings {
    fn from_config(config: &GenerationConfig) -> Self {
        Self {
            spacing: Some(config.spacing),
            units: Some(config.units.suffix().to_string()),
            grid_type: Some(config.pattern.as_str().to_string()),
            rotation: Some(config.rotation_degrees),
            margin_meters: Some(config.margin_meters),
            use_roads: Some(config.use_road_network),
        }
    }

    /// Missing keys take the defaults; spacing without units is meters.
    fn into_config(self) -> Result<GenerationConfig, ProjectError> {
        let units = match self.units.as_deref() {
            None => DistanceUnit::Meters,
            Some(s) => DistanceUnit::from_config_str(s).ok_or_else(|| invalid("units", s))?,
        };
        let pattern = match self.grid_type.as_deref() {
            None => GridPattern::Rectangular,
            Some(s) => GridPattern::from_config_str(s).ok_or_else(|| invalid("gridType", s))?,
        };

        Ok(GenerationConfig {
            spacing: self.spacing.unwrap_or(DEFAULT_SPACING),
            units,
            pattern,
            rotation_degrees: self.rotation.unwrap_or(0.0),
            margin_meters: self.margin_meters.unwrap_or(0.0),
            use_road_network: self.use_roads.unwrap_or(false),
        })
    }
}

fn invalid(key: &str, value: &str) -> ProjectError {
    ProjectError::InvalidSetting {
        key: key.to_string(),
        reason: format!("unrecognised value '{}'", value),
    }
}

/// A saved project.
///
/// Visit status is not persisted; loaded points are all pending.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDocument {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub config: GenerationConfig,
    pub polygon: Polygon,
    pub points: CoverageSet,
}

impl ProjectDocument {
    /// New document stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        polygon: Polygon,
        config: GenerationConfig,
        points: CoverageSet,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created_at: now,
            updated_at: now,
            config,
            polygon,
            points,
        }
    }

    /// Replace the points after a regeneration and bump `updated_at`.
    pub fn set_points(&mut self, config: GenerationConfig, points: CoverageSet) {
        self.config = config;
        self.points = points;
        self.updated_at = Utc::now();
    }

    /// Suggested export file name: whitespace runs become `_`.
    pub fn file_name(&self) -> String {
        let stem: Vec<&str> = self.name.split_whitespace().collect();
        format!("{}.geojson", stem.join("_"))
    }

    /// Encode as a FeatureCollection `[polygon, point...]`.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.points.len() + 1);
        features.push(Feature::new(Geometry::polygon(&self.polygon), Map::new()));
        for point in self.points.points() {
            let mut props = Map::new();
            props.insert("index".to_string(), Value::from(point.index));
            features.push(Feature::new(Geometry::point(point.coord), props));
        }

        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::from(self.name.clone()));
        properties.insert("createdAt".to_string(), Value::from(self.created_at.to_rfc3339()));
        properties.insert("updatedAt".to_string(), Value::from(self.updated_at.to_rfc3339()));
        properties.insert(
            "settings".to_string(),
            serde_json::to_value(StoredSettings::from_config(&self.config))
                .unwrap_or(Value::Null),
        );

        FeatureCollection::new(features).with_properties(properties)
    }

    /// Decode a FeatureCollection.
    ///
    /// Takes the first Polygon feature (error if none) and every Point
    /// feature, ordered by their `index` property when all carry one.
    /// `fallback_name` is used when the document has no name.
    pub fn from_feature_collection(
        collection: FeatureCollection,
        fallback_name: &str,
    ) -> Result<Self, ProjectError> {
        let props = collection.properties.unwrap_or_default();

        let polygon = collection
            .features
            .iter()
            .find_map(|f| match &f.geometry {
                Some(g @ Geometry::Polygon { .. }) => g.to_polygon(),
                _ => None,
            })
            .unwrap_or(Err(ProjectError::MissingPolygon))?;

        let mut points: Vec<(Option<u64>, Coord)> = collection
            .features
            .iter()
            .filter_map(|f| match &f.geometry {
                Some(Geometry::Point { coordinates }) => {
                    Some((f.property("index").and_then(Value::as_u64), coordinates.0))
                }
                _ => None,
            })
            .collect();
        if points.iter().all(|(index, _)| index.is_some()) {
            points.sort_by_key(|(index, _)| *index);
        }

        let settings: StoredSettings = match props.get("settings") {
            Some(Value::Null) | None => StoredSettings::default(),
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| ProjectError::InvalidSetting {
                key: "settings".to_string(),
                reason: e.to_string(),
            })?,
        };
        let config = settings.into_config()?;

        let now = Utc::now();
        let timestamp = |key: &str| {
            props
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc))
        };
        let created_at = timestamp("createdAt").unwrap_or(now);
        let updated_at = timestamp("updatedAt").unwrap_or(created_at);

        let name = props
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_name)
            .to_string();

        debug!(name = %name, points = points.len(), "Decoded project document");

        Ok(Self {
            name,
            created_at,
            updated_at,
            config,
            polygon,
            points: CoverageSet::from_coords(points.into_iter().map(|(_, c)| c).collect()),
        })
    }

    /// Pretty-printed GeoJSON text.
    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(&self.to_feature_collection())?)
    }

    /// Parse GeoJSON text.
    pub fn from_json_str(text: &str, fallback_name: &str) -> Result<Self, ProjectError> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        Self::from_feature_collection(collection, fallback_name)
    }

    /// Write to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Read from `path`; the file stem names documents without a name.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path)?;
        let fallback = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(UNTITLED_PROJECT);
        Self::from_json_str(&text, fallback)
    }
}
