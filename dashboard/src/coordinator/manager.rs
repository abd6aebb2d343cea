//! The coordinator task: surface lifecycle, overlay synchronization, the
//! click interaction pipeline, and base-layer switching.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::handle::DashboardHandle;
use super::messages::{Command, Event, Message};
use super::state::DashboardState;
use crate::catalog::{AreaOfInterest, BaseLayerKind};
use crate::config::Config;
use crate::export;
use crate::gateway::{
    GatewayError, NdviGateway, OverlayDescription, PixelQueryResult, TimeSeriesResult,
};
use crate::geo::LatLng;
use crate::surface::{
    LayerId, PopupContent, RenderingSurface, SurfaceFactory, SurfaceOptions, TileLayerSpec,
};

/// Overlay tiles render above every base layer
const OVERLAY_Z_INDEX: i32 = 1000;
const BASE_LAYER_Z_INDEX: i32 = 0;
const OVERLAY_ATTRIBUTION: &str = "NDVI Data from Google Earth Engine";

/// The overlay currently bound to the surface. `layer` is `None` while the
/// overlay is toggled hidden; the retained spec reattaches it without a
/// refetch.
struct ActiveOverlay {
    area: AreaOfInterest,
    spec: TileLayerSpec,
    layer: Option<LayerId>,
}

/// The visualization state coordinator.
///
/// Owns the surface handle, the layer handles, and [`DashboardState`]
/// exclusively; all mutation happens inside [`Coordinator::run`], one message
/// at a time. Fetches run as spawned tasks and report back as keyed events,
/// so a completion for an area or coordinate the user has moved away from is
/// recognized and discarded.
pub struct Coordinator {
    config: Config,
    gateway: Arc<dyn NdviGateway>,
    factory: Box<dyn SurfaceFactory>,
    surface: Option<Box<dyn RenderingSurface>>,
    base_layer: Option<LayerId>,
    active_overlay: Option<ActiveOverlay>,
    /// Mount options waiting for the deferred-construction timer
    pending_mount: Option<SurfaceOptions>,
    /// Bumped on every teardown; a timer event carrying an older generation
    /// is a canceled construction
    generation: u64,
    state: DashboardState,
    rx: mpsc::UnboundedReceiver<Message>,
    tx: mpsc::UnboundedSender<Message>,
    state_tx: watch::Sender<DashboardState>,
}

impl Coordinator {
    /// Create a coordinator and the handle that drives it
    pub fn new(
        config: Config,
        gateway: Arc<dyn NdviGateway>,
        factory: Box<dyn SurfaceFactory>,
    ) -> (Self, DashboardHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = DashboardState::new(&config.initial);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let coordinator = Self {
            config,
            gateway,
            factory,
            surface: None,
            base_layer: None,
            active_overlay: None,
            pending_mount: None,
            generation: 0,
            state,
            rx,
            tx: tx.clone(),
            state_tx,
        };

        (coordinator, DashboardHandle::new(tx, state_rx))
    }

    /// Create a coordinator and run it on the current runtime
    pub fn spawn(
        config: Config,
        gateway: Arc<dyn NdviGateway>,
        factory: Box<dyn SurfaceFactory>,
    ) -> DashboardHandle {
        let (coordinator, handle) = Self::new(config, gateway, factory);
        tokio::spawn(coordinator.run());
        handle
    }

    /// Process messages until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!("Dashboard coordinator started");

        while let Some(message) = self.rx.recv().await {
            let keep_running = match message {
                Message::Command(command) => self.handle_command(command),
                Message::Event(event) => {
                    self.handle_event(event);
                    true
                }
            };
            if !keep_running {
                break;
            }
        }

        self.teardown_surface();
        info!("Dashboard coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Mount { options } => self.handle_mount(options),
            Command::Unmount => self.handle_unmount(),
            Command::SelectArea(area) => self.handle_select_area(area),
            Command::SetBaseLayer(kind) => self.handle_set_base_layer(kind),
            Command::SetOpacity(opacity) => self.handle_set_opacity(opacity),
            Command::ToggleOverlay => self.handle_toggle_overlay(),
            Command::ToggleTimeSeries => self.handle_toggle_time_series(),
            Command::ToggleStats => {
                self.state.show_stats = !self.state.show_stats;
                self.publish();
            }
            Command::Click(point) => self.handle_click(point),
            Command::Export { reply } => {
                let _ = reply.send(export::snapshot(&self.state));
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::InitTimerFired { generation } => self.handle_init_timer(generation),
            Event::OverlayLoaded { area, result } => self.handle_overlay_loaded(area, result),
            Event::StatsLoaded { point, result } => self.handle_stats_loaded(point, result),
            Event::SeriesLoaded { point, result } => self.handle_series_loaded(point, result),
        }
    }

    // ------------------------------------------------------------------
    // Surface lifecycle
    // ------------------------------------------------------------------

    fn handle_mount(&mut self, options: SurfaceOptions) {
        if self.surface.is_some() || self.pending_mount.is_some() {
            debug!("Re-mount requested, tearing down existing surface first");
        }
        self.teardown_surface();

        self.state.loading = true;
        self.state.error = None;
        self.pending_mount = Some(options);

        // Construction is deferred so the display container can finish
        // layout; teardown before the timer fires cancels it via the
        // generation check.
        let generation = self.generation;
        let delay = self.config.init_delay;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::Event(Event::InitTimerFired { generation }));
        });

        self.publish();
    }

    fn handle_init_timer(&mut self, generation: u64) {
        if generation != self.generation {
            debug!("Deferred surface construction canceled before firing");
            return;
        }
        let Some(options) = self.pending_mount.take() else {
            return;
        };

        match self.factory.create(&options) {
            Ok(mut surface) => {
                let tx = self.tx.clone();
                surface.set_click_handler(Box::new(move |point| {
                    let _ = tx.send(Message::Command(Command::Click(point)));
                }));
                self.base_layer =
                    Some(surface.add_tile_layer(&base_layer_spec(self.state.base_layer)));
                self.surface = Some(surface);
                info!("Rendering surface initialized in '{}'", options.container);

                self.start_overlay_load(self.state.selected_area);
            }
            Err(e) => {
                error!("Surface initialization failed: {}", e);
                self.state.error = Some(e.to_string());
                self.state.loading = false;
                self.publish();
            }
        }
    }

    fn handle_unmount(&mut self) {
        if self.surface.is_some() || self.pending_mount.is_some() {
            info!("Tearing down rendering surface");
        }
        self.teardown_surface();

        self.state.overlay = None;
        self.state.clear_query_results();
        self.state.loading = false;
        self.state.error = None;
        self.publish();
    }

    /// Destroy the surface together with its layers and listeners, and
    /// invalidate any deferred construction still pending
    fn teardown_surface(&mut self) {
        self.generation += 1;
        self.pending_mount = None;
        self.base_layer = None;
        self.active_overlay = None;
        self.surface = None;
    }

    // ------------------------------------------------------------------
    // Overlay synchronization
    // ------------------------------------------------------------------

    fn handle_select_area(&mut self, area: AreaOfInterest) {
        if self.state.selected_area == area {
            debug!("Area {} already selected", area);
            return;
        }
        info!("Selected area changed to {}", area);
        self.state.selected_area = area;
        self.state.clear_query_results();

        if self.surface.is_some() {
            self.start_overlay_load(area);
        } else {
            self.publish();
        }
    }

    fn start_overlay_load(&mut self, area: AreaOfInterest) {
        self.state.loading = true;
        self.state.error = None;
        self.publish();

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.get_overlay(area).await;
            let _ = tx.send(Message::Event(Event::OverlayLoaded { area, result }));
        });
    }

    fn handle_overlay_loaded(
        &mut self,
        area: AreaOfInterest,
        result: Result<OverlayDescription, GatewayError>,
    ) {
        if self.surface.is_none() {
            debug!("Discarding overlay response for {}: surface torn down", area);
            return;
        }
        if area != self.state.selected_area {
            debug!(
                "Discarding overlay response for {}: selection moved to {}",
                area, self.state.selected_area
            );
            return;
        }

        self.state.loading = false;
        match result {
            Ok(description) => {
                self.detach_active_overlay();

                let spec = TileLayerSpec {
                    url: description.tile_url.clone(),
                    attribution: OVERLAY_ATTRIBUTION.to_string(),
                    opacity: self.state.opacity,
                    z_index: OVERLAY_Z_INDEX,
                };
                let overlay_visible = self.state.overlay_visible;
                let mut layer = None;
                if let Some(surface) = self.surface.as_mut() {
                    if overlay_visible {
                        layer = Some(surface.add_tile_layer(&spec));
                    }
                    surface.fit_bounds(area.bounds());
                }

                info!(
                    "Overlay for {} ready: {} images, {} to {}",
                    area,
                    description.image_count,
                    description.date_range.start,
                    description.date_range.end
                );
                self.active_overlay = Some(ActiveOverlay { area, spec, layer });
                self.state.overlay = Some(description);
            }
            Err(e) => {
                warn!("Overlay load for {} failed: {}", area, e);
                // The stale raster does not outlive the failure; the error
                // state is what survives until the user re-selects.
                self.detach_active_overlay();
                self.state.overlay = None;
                self.state.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn detach_active_overlay(&mut self) {
        if let Some(active) = self.active_overlay.take()
            && let Some(layer) = active.layer
            && let Some(surface) = self.surface.as_mut()
        {
            surface.remove_layer(layer);
            debug!("Overlay for {} removed", active.area);
        }
    }

    fn handle_set_opacity(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.state.opacity = opacity;

        // A rendering parameter only: applies to the held layer handle,
        // never triggers a load.
        if let Some(active) = self.active_overlay.as_mut() {
            active.spec.opacity = opacity;
            if let Some(layer) = active.layer
                && let Some(surface) = self.surface.as_mut()
            {
                surface.set_layer_opacity(layer, opacity);
            }
        }
        self.publish();
    }

    fn handle_toggle_overlay(&mut self) {
        self.state.overlay_visible = !self.state.overlay_visible;

        if let Some(active) = self.active_overlay.as_mut()
            && let Some(surface) = self.surface.as_mut()
        {
            if self.state.overlay_visible {
                if active.layer.is_none() {
                    active.layer = Some(surface.add_tile_layer(&active.spec));
                    debug!("Overlay for {} reattached", active.area);
                }
            } else if let Some(layer) = active.layer.take() {
                surface.remove_layer(layer);
                debug!("Overlay for {} hidden", active.area);
            }
        }
        self.publish();
    }

    // ------------------------------------------------------------------
    // Base layer
    // ------------------------------------------------------------------

    fn handle_set_base_layer(&mut self, kind: BaseLayerKind) {
        self.state.base_layer = kind;

        if let Some(surface) = self.surface.as_mut() {
            // Swapped within a single turn: the surface is never observed
            // without a base layer or with two.
            if let Some(previous) = self.base_layer.take() {
                surface.remove_layer(previous);
            }
            self.base_layer = Some(surface.add_tile_layer(&base_layer_spec(kind)));
            debug!("Base layer switched to {}", kind);
        }
        self.publish();
    }

    // ------------------------------------------------------------------
    // Interaction pipeline
    // ------------------------------------------------------------------

    fn handle_click(&mut self, point: LatLng) {
        let Some(surface) = self.surface.as_mut() else {
            debug!("Ignoring click at {}: no surface", point);
            return;
        };

        debug!("Surface click at {}", point);
        self.state.clicked_point = Some(point);
        surface.open_popup(point, PopupContent::Loading { point });

        // Statistics and time series are independent requests; neither waits
        // for the other.
        self.start_stats_query(point);
        if self.state.show_time_series {
            self.start_series_query(point);
        }
        self.publish();
    }

    fn start_stats_query(&self, point: LatLng) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.get_pixel_stats(point).await;
            let _ = tx.send(Message::Event(Event::StatsLoaded { point, result }));
        });
    }

    fn start_series_query(&self, point: LatLng) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.get_time_series(point).await;
            let _ = tx.send(Message::Event(Event::SeriesLoaded { point, result }));
        });
    }

    fn handle_stats_loaded(
        &mut self,
        point: LatLng,
        result: Result<PixelQueryResult, GatewayError>,
    ) {
        if self.state.clicked_point != Some(point) {
            debug!(
                "Discarding pixel statistics for {}: no longer the selected point",
                point
            );
            return;
        }
        match result {
            Ok(stats) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.update_popup(PopupContent::Statistics(stats.clone()));
                }
                self.state.pixel_stats = Some(stats);
                self.publish();
            }
            Err(e) => {
                // Point queries fail routinely at the surface's pan/zoom
                // edges; the popup keeps its last content.
                debug!("Pixel statistics query at {} failed: {}", point, e);
            }
        }
    }

    fn handle_series_loaded(
        &mut self,
        point: LatLng,
        result: Result<TimeSeriesResult, GatewayError>,
    ) {
        if self.state.clicked_point != Some(point) {
            debug!(
                "Discarding time series for {}: no longer the selected point",
                point
            );
            return;
        }
        match result {
            Ok(series) => {
                self.state.time_series = Some(series);
                self.publish();
            }
            Err(e) => {
                debug!("Time series query at {} failed: {}", point, e);
            }
        }
    }

    fn handle_toggle_time_series(&mut self) {
        self.state.show_time_series = !self.state.show_time_series;

        // Turning the view on with a point already selected fetches for that
        // point right away instead of waiting for the next click.
        if self.state.show_time_series
            && let Some(point) = self.state.clicked_point
        {
            self.start_series_query(point);
        }
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

fn base_layer_spec(kind: BaseLayerKind) -> TileLayerSpec {
    TileLayerSpec {
        url: kind.tile_url_template().to_string(),
        attribution: kind.attribution().to_string(),
        opacity: 1.0,
        z_index: BASE_LAYER_Z_INDEX,
    }
}
