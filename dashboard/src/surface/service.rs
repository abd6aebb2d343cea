//! RenderingSurface and SurfaceFactory trait definitions

use super::types::{LayerId, PopupContent, SurfaceError, SurfaceOptions, TileLayerSpec};
use crate::geo::{LatLng, LatLngBounds};

/// Invoked by the surface for every user click, with the clicked coordinate
pub type ClickHandler = Box<dyn Fn(LatLng) + Send>;

/// One interactive map widget instance.
///
/// Mutations are infallible commands: once a surface exists, layer and popup
/// operations are display-side concerns that cannot meaningfully fail from
/// the coordinator's point of view. Dropping the surface destroys it along
/// with every attached layer and handler.
pub trait RenderingSurface: Send {
    /// Attach a tile layer and return its handle
    fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> LayerId;

    /// Detach a previously attached layer
    fn remove_layer(&mut self, layer: LayerId);

    /// Change the opacity of an attached layer
    fn set_layer_opacity(&mut self, layer: LayerId, opacity: f64);

    /// Adjust the viewport to show the given region
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Open the transient popup anchored at a coordinate, replacing any
    /// popup already open
    fn open_popup(&mut self, anchor: LatLng, content: PopupContent);

    /// Update the open popup's content in place; a no-op if none is open
    fn update_popup(&mut self, content: PopupContent);

    /// Install the click listener, replacing any previous one
    fn set_click_handler(&mut self, handler: ClickHandler);
}

/// Creates rendering surfaces bound to a display container
pub trait SurfaceFactory: Send {
    fn create(&self, options: &SurfaceOptions) -> Result<Box<dyn RenderingSurface>, SurfaceError>;
}
