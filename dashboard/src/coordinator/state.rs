//! The reactive state container presentation reads

use serde::Serialize;

use crate::catalog::{AreaOfInterest, BaseLayerKind};
use crate::config::InitialState;
use crate::gateway::{OverlayDescription, PixelQueryResult, TimeSeriesResult};
use crate::geo::LatLng;

/// Everything downstream presentation needs to render the dashboard.
///
/// One instance exists per coordinator; it is mutated only inside the
/// coordinator task and published as snapshots, so readers never observe a
/// half-applied transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub selected_area: AreaOfInterest,
    pub base_layer: BaseLayerKind,
    /// Overlay opacity in [0, 1]
    pub opacity: f64,
    pub overlay_visible: bool,
    pub show_time_series: bool,
    pub show_stats: bool,
    /// Description of the last successfully loaded overlay
    pub overlay: Option<OverlayDescription>,
    /// Statistics for the most recent click
    pub pixel_stats: Option<PixelQueryResult>,
    /// Time series for the most recent click, when the toggle was on
    pub time_series: Option<TimeSeriesResult>,
    pub clicked_point: Option<LatLng>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn new(initial: &InitialState) -> Self {
        Self {
            selected_area: initial.area,
            base_layer: initial.base_layer,
            opacity: initial.opacity.clamp(0.0, 1.0),
            overlay_visible: true,
            show_time_series: false,
            show_stats: false,
            overlay: None,
            pixel_stats: None,
            time_series: None,
            clicked_point: None,
            loading: false,
            error: None,
        }
    }

    /// Drop everything tied to the last clicked point
    pub(crate) fn clear_query_results(&mut self) {
        self.clicked_point = None;
        self.pixel_stats = None;
        self.time_series = None;
    }
}
