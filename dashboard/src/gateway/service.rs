//! NdviGateway trait definition

use async_trait::async_trait;

use super::types::{GatewayError, OverlayDescription, PixelQueryResult, TimeSeriesResult};
use crate::catalog::AreaOfInterest;
use crate::geo::LatLng;

/// Trait for NDVI backend gateways (HTTP in production, mocks in tests).
///
/// These are the only three remote queries the dashboard issues.
#[async_trait]
pub trait NdviGateway: Send + Sync {
    /// Get the overlay description for an area of interest
    async fn get_overlay(&self, area: AreaOfInterest) -> Result<OverlayDescription, GatewayError>;

    /// Get pixel statistics at a coordinate
    async fn get_pixel_stats(&self, point: LatLng) -> Result<PixelQueryResult, GatewayError>;

    /// Get the historical time series at a coordinate
    async fn get_time_series(&self, point: LatLng) -> Result<TimeSeriesResult, GatewayError>;
}
