//! NDVI Dashboard Coordinator Library
//!
//! The visualization state coordinator for an NDVI dashboard: owns the
//! rendering surface lifecycle, fetches overlay and point-query data from the
//! NDVI backend, and keeps displayed state from regressing to stale
//! responses. Embedders provide a [`surface::SurfaceFactory`] for their map
//! widget and drive everything through a [`coordinator::DashboardHandle`].

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod export;
pub mod gateway;
pub mod geo;
pub mod surface;

// Re-export commonly used types
pub use catalog::{AreaOfInterest, BaseLayerKind};
pub use config::Config;
pub use coordinator::{Coordinator, DashboardHandle, DashboardState};
pub use gateway::{HttpNdviGateway, NdviGateway};
pub use geo::{LatLng, LatLngBounds};
pub use surface::{RenderingSurface, SurfaceFactory, SurfaceOptions};
