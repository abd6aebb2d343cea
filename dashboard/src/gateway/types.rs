//! Wire contract types and gateway error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::LatLng;

/// Errors that can occur when querying the NDVI backend
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, DNS, or timeout failure in the transport layer
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// Backend answered 2xx but reported an error in the payload
    #[error("{0}")]
    Backend(String),
}

/// Result of a successful area query: where the overlay tiles live and what
/// imagery went into them. Replaced wholesale on every area change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDescription {
    /// Tile-source locator for the computed NDVI raster
    pub tile_url: String,
    /// Human-readable area name as reported by the backend
    pub aoi_name: String,
    /// Number of source images composited into the overlay
    pub image_count: u32,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Statistical summary of the overlay's values at a single coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelQueryResult {
    pub point: LatLng,
    pub statistics: PixelStatistics,
    pub image_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

/// Ordered historical sequence of index values at a single coordinate,
/// date-ascending as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    pub point: LatLng,
    pub time_series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub ndvi: f64,
}
