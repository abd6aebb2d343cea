//! NDVI backend gateway
//!
//! Issues the three remote queries the dashboard depends on (overlay for an
//! area, pixel statistics, time series) and normalizes transport, status, and
//! backend-reported failures into [`GatewayError`].

pub mod http;
pub mod service;
pub mod types;

pub use http::HttpNdviGateway;
pub use service::NdviGateway;
pub use types::{
    DateRange, GatewayError, OverlayDescription, PixelQueryResult, PixelStatistics,
    TimeSeriesPoint, TimeSeriesResult,
};
