//! Road-data collaborator trait and an in-memory implementation.

use std::future::Future;
use std::pin::Pin;

use super::types::{RoadDataError, RoadSegment};
use crate::geometry::BoundingBox;

/// Boxed future type for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Supplies drivable roads for an area.
///
/// Implementations return roads whose geometry may intersect `bbox`
/// (exact clipping is not required). An area with no roads yields an empty
/// list; only a failure to obtain the data is an error.
///
/// Uses boxed futures so sources can be chosen at runtime behind
/// `Arc<dyn RoadSource>`.
pub trait RoadSource: Send + Sync {
    /// Fetch roads within a bounding box.
    fn fetch_roads(&self, bbox: BoundingBox) -> BoxFuture<'_, Result<Vec<RoadSegment>, RoadDataError>>;

    /// Human-readable source name for logging.
    fn name(&self) -> &str;
}

/// Road source backed by a fixed list (files, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticRoadSource {
    roads: Vec<RoadSegment>,
}

impl StaticRoadSource {
    /// Create a source over the given roads.
    pub fn new(roads: Vec<RoadSegment>) -> Self {
        Self { roads }
    }

    /// All roads held by the source.
    pub fn roads(&self) -> &[RoadSegment] {
        &self.roads
    }
}

impl RoadSource for StaticRoadSource {
    fn fetch_roads(&self, bbox: BoundingBox) -> BoxFuture<'_, Result<Vec<RoadSegment>, RoadDataError>> {
        Box::pin(async move {
            Ok(self
                .roads
                .iter()
                .filter(|r| r.bounding_box().intersects(&bbox))
                .cloned()
                .collect())
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}
