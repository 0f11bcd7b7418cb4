//! Road-network data
//!
//! Roads are supplied by a [`RoadSource`]: the Overpass API in production,
//! a [`StaticRoadSource`] for files and tests. The sampler consumes the
//! resulting [`RoadSegment`] list as opaque line geometries.
//!
//! # Example
//!
//! ```ignore
//! use fieldcover::roads::{AsyncReqwestClient, OverpassRoadSource, RoadSource};
//!
//! let source = OverpassRoadSource::new(AsyncReqwestClient::new()?);
//! let roads = source.fetch_roads(polygon.bounding_box()).await?;
//! ```

mod http;
mod overpass;
mod source;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use overpass::{
    build_query, parse_response, OverpassRoadSource, DEFAULT_OVERPASS_URL,
    OVERPASS_QUERY_TIMEOUT_SECS,
};
pub use source::{BoxFuture, RoadSource, StaticRoadSource};
pub use types::{is_drivable, RoadDataError, RoadSegment, DRIVABLE_HIGHWAYS};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
