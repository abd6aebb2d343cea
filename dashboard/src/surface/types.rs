//! Surface-related types and error definitions

use thiserror::Error;

use crate::gateway::PixelQueryResult;
use crate::geo::LatLng;

/// Errors that can occur when constructing a rendering surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to initialize rendering surface: {0}")]
    Construction(String),

    #[error("display container not available: {0}")]
    ContainerUnavailable(String),
}

/// Opaque handle to a layer attached to a surface. Handles are owned by the
/// coordinator; replacement is remove-then-attach, never in-place mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Everything a surface needs to materialize one tile layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerSpec {
    pub url: String,
    pub attribution: String,
    pub opacity: f64,
    pub z_index: i32,
}

/// Construction parameters for a surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Identifier of the display container the surface binds to
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            center: LatLng::new(40.7128, -74.006),
            zoom: 10,
            min_zoom: 3,
            max_zoom: 19,
        }
    }
}

/// Content of the transient click popup. The surface renders it however the
/// widget likes; the coordinator only sequences loading → statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupContent {
    /// Clicked coordinate shown while the pixel query is in flight
    Loading { point: LatLng },
    /// Resolved pixel statistics for the clicked coordinate
    Statistics(PixelQueryResult),
}
