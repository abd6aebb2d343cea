//! Headless rendering surface
//!
//! A surface that renders nothing and logs every operation. Used by the
//! smoke-run binary and by embedders that want to observe coordinator
//! behavior without a real map widget.

use tracing::{debug, info};

use super::service::{ClickHandler, RenderingSurface, SurfaceFactory};
use super::types::{LayerId, PopupContent, SurfaceError, SurfaceOptions, TileLayerSpec};
use crate::geo::{LatLng, LatLngBounds};

pub struct HeadlessSurface {
    container: String,
    next_layer_id: u64,
    attached: Vec<LayerId>,
    click_handler: Option<ClickHandler>,
}

impl HeadlessSurface {
    fn new(options: &SurfaceOptions) -> Self {
        info!(
            "Created headless surface in '{}' centered at {} (zoom {}, range {}..={})",
            options.container, options.center, options.zoom, options.min_zoom, options.max_zoom
        );
        Self {
            container: options.container.clone(),
            next_layer_id: 1,
            attached: Vec::new(),
            click_handler: None,
        }
    }

    /// Simulate a user click, forwarding to the installed handler
    pub fn emit_click(&self, point: LatLng) {
        if let Some(handler) = &self.click_handler {
            handler(point);
        }
    }
}

impl RenderingSurface for HeadlessSurface {
    fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        self.attached.push(id);
        debug!(
            "Attached layer {:?}: url={}, opacity={}, z={}",
            id, spec.url, spec.opacity, spec.z_index
        );
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.attached.retain(|&id| id != layer);
        debug!("Detached layer {:?}", layer);
    }

    fn set_layer_opacity(&mut self, layer: LayerId, opacity: f64) {
        debug!("Layer {:?} opacity set to {}", layer, opacity);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        debug!(
            "Viewport fitted to {} .. {}",
            bounds.south_west, bounds.north_east
        );
    }

    fn open_popup(&mut self, anchor: LatLng, content: PopupContent) {
        debug!("Popup opened at {}: {:?}", anchor, content);
    }

    fn update_popup(&mut self, content: PopupContent) {
        debug!("Popup updated: {:?}", content);
    }

    fn set_click_handler(&mut self, handler: ClickHandler) {
        self.click_handler = Some(handler);
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        info!(
            "Destroyed headless surface in '{}' ({} layers attached)",
            self.container,
            self.attached.len()
        );
    }
}

/// Factory producing [`HeadlessSurface`] instances
#[derive(Default)]
pub struct HeadlessSurfaceFactory;

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&self, options: &SurfaceOptions) -> Result<Box<dyn RenderingSurface>, SurfaceError> {
        if options.container.is_empty() {
            return Err(SurfaceError::ContainerUnavailable(
                "empty container identifier".to_string(),
            ));
        }
        Ok(Box::new(HeadlessSurface::new(options)))
    }
}
