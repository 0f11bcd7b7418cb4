//! Generation entry points dispatching between grid and road modes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::config::GenerationConfig;
use super::error::GenerationError;
use super::road_sampler::sample_along_roads;
use super::tessellator::tessellate;
use super::types::CoverageSet;
use crate::geometry::Polygon;
use crate::roads::{RoadDataError, RoadSource};

/// Default time allowed for a road fetch.
pub const DEFAULT_ROAD_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Generate a coverage set without road data.
///
/// Road mode needs a [`RoadSource`] and is rejected here; use
/// [`generate_from_roads`] or a [`Generator`] instead.
pub fn generate(polygon: &Polygon, config: &GenerationConfig) -> Result<CoverageSet, GenerationError> {
    if config.use_road_network {
        return Err(GenerationError::InvalidConfig(
            "road-network mode requires a road source".to_string(),
        ));
    }
    tessellate(polygon, config)
}

/// Fetch roads for the polygon's bounding box and sample along them.
///
/// The fetch is bounded by `timeout`; expiry and fetch failures are
/// reported as [`GenerationError::RoadDataUnavailable`]. Pattern, rotation
/// and margin are ignored.
pub async fn generate_from_roads(
    polygon: &Polygon,
    config: &GenerationConfig,
    source: &dyn RoadSource,
    timeout: Duration,
) -> Result<CoverageSet, GenerationError> {
    config.validate()?;

    let bbox = polygon.bounding_box();
    let roads = match tokio::time::timeout(timeout, source.fetch_roads(bbox)).await {
        Ok(Ok(roads)) => roads,
        Ok(Err(e)) => {
            warn!(source = source.name(), error = %e, "Road fetch failed");
            return Err(e.into());
        }
        Err(_) => {
            warn!(
                source = source.name(),
                timeout_secs = timeout.as_secs(),
                "Road fetch timed out"
            );
            return Err(RoadDataError::Timeout {
                timeout_secs: timeout.as_secs(),
            }
            .into());
        }
    };

    info!(source = source.name(), roads = roads.len(), "Fetched road network");
    sample_along_roads(polygon, &roads, config.spacing, config.units)
}

/// Generation front end holding an optional road source.
///
/// Dispatches on [`GenerationConfig::use_road_network`].
#[derive(Clone)]
pub struct Generator {
    road_source: Option<Arc<dyn RoadSource>>,
    road_timeout: Duration,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            road_source: None,
            road_timeout: DEFAULT_ROAD_FETCH_TIMEOUT,
        }
    }
}

impl Generator {
    /// Grid-only generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a road source.
    pub fn with_road_source(mut self, source: Arc<dyn RoadSource>) -> Self {
        self.road_source = Some(source);
        self
    }

    /// Set the road fetch timeout.
    pub fn with_road_timeout(mut self, timeout: Duration) -> Self {
        self.road_timeout = timeout;
        self
    }

    /// Generate a coverage set for `polygon`.
    pub async fn generate(
        &self,
        polygon: &Polygon,
        config: &GenerationConfig,
    ) -> Result<CoverageSet, GenerationError> {
        if !config.use_road_network {
            return tessellate(polygon, config);
        }
        match &self.road_source {
            Some(source) => {
                generate_from_roads(polygon, config, source.as_ref(), self.road_timeout).await
            }
            None => Err(GenerationError::InvalidConfig(
                "road-network mode requires a road source".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, DistanceUnit, LineString};
    use crate::roads::{BoxFuture, RoadSegment, StaticRoadSource};
    use crate::geometry::BoundingBox;

    fn area() -> Polygon {
        Polygon::from_ring(vec![
            Coord::new(10.0, 53.0),
            Coord::new(10.02, 53.0),
            Coord::new(10.02, 53.02),
            Coord::new(10.0, 53.02),
        ])
        .unwrap()
    }

    fn main_street() -> RoadSegment {
        RoadSegment::new(
            LineString::new(vec![Coord::new(10.005, 53.01), Coord::new(10.015, 53.01)]).unwrap(),
        )
        .with_highway("residential")
    }

    struct FailingSource;

    impl RoadSource for FailingSource {
        fn fetch_roads(&self, _bbox: BoundingBox) -> BoxFuture<'_, Result<Vec<RoadSegment>, RoadDataError>> {
            Box::pin(async { Err(RoadDataError::Http("connection refused".to_string())) })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowSource;

    impl RoadSource for SlowSource {
        fn fetch_roads(&self, _bbox: BoundingBox) -> BoxFuture<'_, Result<Vec<RoadSegment>, RoadDataError>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Vec::new())
            })
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_generate_grid() {
        let set = generate(&area(), &GenerationConfig::new(200.0, DistanceUnit::Meters)).unwrap();
        assert!(!set.is_empty());
    }

    #[test]
    fn test_generate_rejects_road_mode() {
        let config = GenerationConfig::default().with_road_network(true);
        assert!(matches!(
            generate(&area(), &config),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_from_roads() {
        let source = StaticRoadSource::new(vec![main_street()]);
        let config = GenerationConfig::new(100.0, DistanceUnit::Meters).with_road_network(true);
        let set = generate_from_roads(&area(), &config, &source, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(set.len(), 7);
    }

    #[tokio::test]
    async fn test_no_roads_is_empty_not_error() {
        let source = StaticRoadSource::default();
        let config = GenerationConfig::default().with_road_network(true);
        let set = generate_from_roads(&area(), &config, &source, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_road_data_unavailable() {
        let config = GenerationConfig::default().with_road_network(true);
        let err = generate_from_roads(&area(), &config, &FailingSource, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::RoadDataUnavailable(RoadDataError::Http(_))
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_timeout_is_road_data_unavailable() {
        let config = GenerationConfig::default().with_road_network(true);
        let err = generate_from_roads(&area(), &config, &SlowSource, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::RoadDataUnavailable(RoadDataError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_generator_dispatch() {
        let config = GenerationConfig::new(100.0, DistanceUnit::Meters);

        let grid_only = Generator::new();
        assert!(!grid_only.generate(&area(), &config).await.unwrap().is_empty());
        assert!(grid_only
            .generate(&area(), &config.clone().with_road_network(true))
            .await
            .is_err());

        let with_roads = Generator::new()
            .with_road_source(Arc::new(StaticRoadSource::new(vec![main_street()])))
            .with_road_timeout(Duration::from_secs(2));
        let set = with_roads
            .generate(&area(), &config.with_road_network(true))
            .await
            .unwrap();
        assert_eq!(set.len(), 7);
    }
}
