//! Integration tests for coverage generation.
//!
//! These tests drive the public API end to end:
//! - GeoJSON polygon → grid coverage → project document on disk
//! - Road-network generation through the Overpass source with a canned body
//! - Timeout and empty-road behaviour of the async generator
//!
//! Run with: `cargo test --test generation_integration`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fieldcover::coverage::{generate, GenerationConfig, GenerationError, Generator, GridPattern};
use fieldcover::geometry::{
    distance_meters, point_in_polygon, Coord, DistanceUnit, LineString, Polygon,
    EARTH_RADIUS_METERS,
};
use fieldcover::project::{parse_polygon, ProjectDocument};
use fieldcover::roads::{
    AsyncHttpClient, OverpassRoadSource, RoadDataError, RoadSegment, StaticRoadSource,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Degrees of latitude spanning one kilometre.
fn one_km_deg() -> f64 {
    (1000.0 / EARTH_RADIUS_METERS).to_degrees()
}

/// A 1 km × 1 km square at the origin as a GeoJSON Feature.
fn km_square_geojson() -> String {
    let d = one_km_deg();
    format!(
        r#"{{"type":"Feature","properties":{{"name":"Test field"}},
            "geometry":{{"type":"Polygon","coordinates":[[[0,0],[{d},0],[{d},{d}],[0,{d}],[0,0]]]}}}}"#
    )
}

/// Small survey block in Hamburg.
fn hamburg_block() -> Polygon {
    Polygon::from_ring(vec![
        Coord::new(9.990, 53.550),
        Coord::new(10.010, 53.550),
        Coord::new(10.010, 53.560),
        Coord::new(9.990, 53.560),
    ])
    .unwrap()
}

/// HTTP client that answers every request with the same body.
struct CannedHttpClient {
    body: Vec<u8>,
}

impl AsyncHttpClient for CannedHttpClient {
    fn post(
        &self,
        _url: &str,
        _body: String,
    ) -> impl Future<Output = Result<Vec<u8>, RoadDataError>> + Send {
        let body = self.body.clone();
        async move { Ok(body) }
    }
}

/// One east-west road through the middle of [`hamburg_block`], as Overpass JSON.
const OVERPASS_BODY: &str = r#"{
  "version": 0.6,
  "elements": [
    {"type": "way", "id": 100, "nodes": [1, 2], "tags": {"highway": "residential", "name": "Lange Reihe"}},
    {"type": "node", "id": 1, "lat": 53.555, "lon": 9.992},
    {"type": "node", "id": 2, "lat": 53.555, "lon": 10.008}
  ]
}"#;

// ============================================================================
// Grid generation
// ============================================================================

#[test]
fn test_km_square_from_geojson_gives_81_points() {
    let polygon = parse_polygon(&km_square_geojson()).unwrap();
    let config = GenerationConfig::new(0.1, DistanceUnit::Kilometers);

    let points = generate(&polygon, &config).unwrap();

    assert_eq!(points.len(), 81);
    for (i, point) in points.points().iter().enumerate() {
        assert_eq!(point.index, i);
        assert!(point_in_polygon(point.coord, &polygon));
    }
}

#[test]
fn test_hex_rotated_with_margin_stays_clear_of_edges() {
    let polygon = hamburg_block();
    let config = GenerationConfig::new(80.0, DistanceUnit::Meters)
        .with_pattern(GridPattern::Hexagonal)
        .with_rotation(30.0)
        .with_margin_meters(50.0);

    let points = generate(&polygon, &config).unwrap();
    assert!(!points.is_empty());

    let exterior = polygon.exterior();
    for point in points.points() {
        // Nearest vertex distance is an upper bound on edge distance; at
        // least check no point sits on a corner.
        for vertex in exterior {
            assert!(distance_meters(point.coord, *vertex) > 45.0);
        }
    }
}

#[test]
fn test_regeneration_is_deterministic() {
    let polygon = hamburg_block();
    let config = GenerationConfig::new(60.0, DistanceUnit::Meters).with_rotation(12.5);
    assert_eq!(
        generate(&polygon, &config).unwrap(),
        generate(&polygon, &config).unwrap()
    );
}

#[test]
fn test_generated_project_survives_disk_round_trip() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let polygon = parse_polygon(&km_square_geojson()).unwrap();
    let config = GenerationConfig::new(0.1, DistanceUnit::Kilometers)
        .with_pattern(GridPattern::Hexagonal);
    let points = generate(&polygon, &config).unwrap();

    let document = ProjectDocument::new("North meadow", polygon, config, points);
    let path = temp_dir.path().join(document.file_name());
    document.save(&path).unwrap();

    let loaded = ProjectDocument::load(&path).unwrap();
    assert_eq!(loaded.name, "North meadow");
    assert_eq!(loaded.config, document.config);
    assert_eq!(loaded.polygon, document.polygon);
    assert_eq!(loaded.points.len(), document.points.len());
    assert!(path.ends_with("North_meadow.geojson"));
}

// ============================================================================
// Road-network generation
// ============================================================================

#[tokio::test]
async fn test_overpass_roads_are_sampled_at_spacing() {
    let source = OverpassRoadSource::new(CannedHttpClient {
        body: OVERPASS_BODY.as_bytes().to_vec(),
    });
    let generator = Generator::new().with_road_source(Arc::new(source));
    let config = GenerationConfig::new(200.0, DistanceUnit::Meters).with_road_network(true);

    let points = generator.generate(&hamburg_block(), &config).await.unwrap();

    // Road is ~1.06 km long: samples at 0, 200, ..., 1000 m
    assert_eq!(points.len(), 6);
    let coords: Vec<Coord> = points.coords().collect();
    for pair in coords.windows(2) {
        let gap = distance_meters(pair[0], pair[1]);
        assert!((gap - 200.0).abs() < 1.0, "gap {}", gap);
    }
}

#[tokio::test]
async fn test_overpass_query_timeout_is_unavailable_not_empty() {
    let body = br#"{"version":0.6,"elements":[],"remark":"runtime error: Query timed out in \"query\" at line 3 after 26 seconds."}"#;
    let source = OverpassRoadSource::new(CannedHttpClient { body: body.to_vec() });
    let generator = Generator::new().with_road_source(Arc::new(source));
    let config = GenerationConfig::default().with_road_network(true);

    let result = generator.generate(&hamburg_block(), &config).await;
    match result {
        Err(e @ GenerationError::RoadDataUnavailable(RoadDataError::Timeout { .. })) => {
            assert!(e.is_retryable());
        }
        other => panic!("expected RoadDataUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_roads_gives_empty_set() {
    let generator = Generator::new().with_road_source(Arc::new(StaticRoadSource::new(Vec::new())));
    let config = GenerationConfig::default().with_road_network(true);

    let points = generator.generate(&hamburg_block(), &config).await.unwrap();
    assert!(points.is_empty());
}

#[tokio::test]
async fn test_roads_outside_area_give_empty_set() {
    let far_away = RoadSegment::new(
        LineString::new(vec![Coord::new(2.35, 48.85), Coord::new(2.36, 48.85)]).unwrap(),
    );
    let generator =
        Generator::new().with_road_source(Arc::new(StaticRoadSource::new(vec![far_away])));
    let config = GenerationConfig::default().with_road_network(true);

    let points = generator.generate(&hamburg_block(), &config).await.unwrap();
    assert!(points.is_empty());
}

#[tokio::test]
async fn test_road_mode_without_source_is_rejected() {
    let config = GenerationConfig::default().with_road_network(true);
    let result = Generator::new().generate(&hamburg_block(), &config).await;
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_slow_road_source_times_out() {
    struct StalledClient;

    impl AsyncHttpClient for StalledClient {
        fn post(
            &self,
            _url: &str,
            _body: String,
        ) -> impl Future<Output = Result<Vec<u8>, RoadDataError>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }

    let generator = Generator::new()
        .with_road_source(Arc::new(OverpassRoadSource::new(StalledClient)))
        .with_road_timeout(Duration::from_secs(5));
    let config = GenerationConfig::default().with_road_network(true);

    let result = generator.generate(&hamburg_block(), &config).await;
    assert!(matches!(
        result,
        Err(GenerationError::RoadDataUnavailable(RoadDataError::Timeout { timeout_secs: 5 }))
    ));
}
