//! OpenStreetMap road data via the Overpass API.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::http::AsyncHttpClient;
use super::source::{BoxFuture, RoadSource};
use super::types::{RoadDataError, RoadSegment, DRIVABLE_HIGHWAYS};
use crate::geometry::{BoundingBox, Coord, LineString};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout in seconds.
pub const OVERPASS_QUERY_TIMEOUT_SECS: u64 = 25;

/// Build the Overpass QL query for drivable ways in `bbox`.
///
/// Overpass expects `(south, west, north, east)`.
pub fn build_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  way[\"highway\"~\"^({classes})$\"]({south},{west},{north},{east});\n);\n\
         out body;\n>;\nout skel qt;\n",
        timeout = OVERPASS_QUERY_TIMEOUT_SECS,
        classes = DRIVABLE_HIGHWAYS.join("|"),
        south = bbox.min_y,
        west = bbox.min_x,
        north = bbox.max_y,
        east = bbox.max_x,
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
    /// Set by the server when the query failed after a 200 status.
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Turn an Overpass JSON response into road segments.
///
/// Nodes are indexed first, then each way's node references are resolved.
/// Missing nodes are skipped; ways left with fewer than two coordinates are
/// dropped.
pub fn parse_response(body: &[u8]) -> Result<Vec<RoadSegment>, RoadDataError> {
    let response: OverpassResponse = serde_json::from_slice(body)
        .map_err(|e| RoadDataError::Malformed(format!("Invalid Overpass JSON: {}", e)))?;

    if let Some(error) = response.remark.as_deref().and_then(remark_error) {
        return Err(error);
    }

    let mut nodes: HashMap<i64, Coord> = HashMap::new();
    let mut ways = Vec::new();
    for element in response.elements {
        match element.kind.as_str() {
            "node" => {
                if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
                    nodes.insert(element.id, Coord::new(lon, lat));
                }
            }
            "way" => ways.push(element),
            _ => {}
        }
    }

    let mut segments = Vec::with_capacity(ways.len());
    for mut way in ways {
        let coords: Vec<Coord> = way
            .nodes
            .iter()
            .filter_map(|id| nodes.get(id).copied())
            .collect();
        let Ok(line) = LineString::new(coords) else {
            debug!(way_id = way.id, "Skipping way with fewer than two resolvable nodes");
            continue;
        };
        segments.push(RoadSegment {
            line,
            name: way.tags.remove("name"),
            highway: way.tags.remove("highway"),
        });
    }

    Ok(segments)
}

/// A failed query still answers 200, with partial elements and a
/// `runtime error` remark.
fn remark_error(remark: &str) -> Option<RoadDataError> {
    let lower = remark.to_lowercase();
    if !lower.contains("runtime error") {
        return None;
    }
    if lower.contains("timed out") {
        Some(RoadDataError::Timeout {
            timeout_secs: OVERPASS_QUERY_TIMEOUT_SECS,
        })
    } else {
        Some(RoadDataError::Malformed(format!("Overpass query failed: {}", remark)))
    }
}

/// Road source querying an Overpass interpreter.
pub struct OverpassRoadSource<C: AsyncHttpClient> {
    http_client: C,
    url: String,
}

impl<C: AsyncHttpClient> OverpassRoadSource<C> {
    /// Creates a source against the public endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_url(http_client, DEFAULT_OVERPASS_URL)
    }

    /// Creates a source against a custom interpreter URL.
    pub fn with_url(http_client: C, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    /// Interpreter URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self, bbox: BoundingBox) -> Result<Vec<RoadSegment>, RoadDataError> {
        let query = build_query(&bbox);
        let body = self.http_client.post(&self.url, query).await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Overpass request failed");
            e
        })?;
        let roads = parse_response(&body)?;
        debug!(bbox = %bbox, roads = roads.len(), "Fetched roads from Overpass");
        Ok(roads)
    }
}

impl<C: AsyncHttpClient> RoadSource for OverpassRoadSource<C> {
    fn fetch_roads(&self, bbox: BoundingBox) -> BoxFuture<'_, Result<Vec<RoadSegment>, RoadDataError>> {
        Box::pin(self.fetch(bbox))
    }

    fn name(&self) -> &str {
        "overpass"
    }
}
