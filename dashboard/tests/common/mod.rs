//! Common test utilities for integration tests
//!
//! A programmable mock gateway (with per-request release gates so tests
//! control arrival order) and an operation-recording mock surface.

#![allow(dead_code)]

use async_trait::async_trait;
use ndvi_dashboard::catalog::AreaOfInterest;
use ndvi_dashboard::config::Config;
use ndvi_dashboard::coordinator::{Coordinator, DashboardHandle};
use ndvi_dashboard::gateway::{
    DateRange, GatewayError, NdviGateway, OverlayDescription, PixelQueryResult, PixelStatistics,
    TimeSeriesPoint, TimeSeriesResult,
};
use ndvi_dashboard::geo::{LatLng, LatLngBounds};
use ndvi_dashboard::surface::{
    ClickHandler, LayerId, PopupContent, RenderingSurface, SurfaceError, SurfaceFactory,
    SurfaceOptions, TileLayerSpec,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Generous ceiling for any single state transition in tests
pub const SETTLE: Duration = Duration::from_secs(5);

// ============================================================================
// Fixtures
// ============================================================================

pub fn overlay_description_for(area: AreaOfInterest) -> OverlayDescription {
    OverlayDescription {
        tile_url: format!("https://tiles.example/{}/{{z}}/{{x}}/{{y}}", area.id()),
        aoi_name: area.display_name().to_string(),
        image_count: 42,
        date_range: DateRange {
            start: "2024-01-01".to_string(),
            end: "2024-06-30".to_string(),
        },
    }
}

pub fn pixel_stats_for(point: LatLng) -> PixelQueryResult {
    PixelQueryResult {
        point,
        statistics: PixelStatistics {
            mean: 0.42,
            min: -0.05,
            max: 0.87,
            std_dev: 0.11,
        },
        image_count: 17,
    }
}

pub fn time_series_for(point: LatLng) -> TimeSeriesResult {
    TimeSeriesResult {
        point,
        time_series: vec![
            TimeSeriesPoint {
                date: "2024-01-05".to_string(),
                ndvi: 0.21,
            },
            TimeSeriesPoint {
                date: "2024-02-04".to_string(),
                ndvi: 0.35,
            },
            TimeSeriesPoint {
                date: "2024-03-05".to_string(),
                ndvi: 0.48,
            },
        ],
    }
}

/// Poll until a condition holds, failing the test after [`SETTLE`]
pub async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + SETTLE;
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// ============================================================================
// Mock gateway
// ============================================================================

/// Mock NDVI gateway with request logs, programmable failures, and optional
/// gates that hold each response until the test releases it by key.
pub struct MockGateway {
    gate_overlays: bool,
    gate_stats: bool,
    overlay_failures: Mutex<HashMap<AreaOfInterest, String>>,
    stats_failure: Mutex<Option<String>>,
    series_failure: Mutex<Option<String>>,
    pub overlay_calls: Mutex<Vec<AreaOfInterest>>,
    pub stats_calls: Mutex<Vec<LatLng>>,
    pub series_calls: Mutex<Vec<LatLng>>,
    overlay_waiters: Mutex<Vec<(AreaOfInterest, oneshot::Sender<()>)>>,
    stats_waiters: Mutex<Vec<(LatLng, oneshot::Sender<()>)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            gate_overlays: false,
            gate_stats: false,
            overlay_failures: Mutex::new(HashMap::new()),
            stats_failure: Mutex::new(None),
            series_failure: Mutex::new(None),
            overlay_calls: Mutex::new(Vec::new()),
            stats_calls: Mutex::new(Vec::new()),
            series_calls: Mutex::new(Vec::new()),
            overlay_waiters: Mutex::new(Vec::new()),
            stats_waiters: Mutex::new(Vec::new()),
        }
    }

    /// Hold every overlay response until `release_overlay` is called
    pub fn gate_overlays(mut self) -> Self {
        self.gate_overlays = true;
        self
    }

    /// Hold every pixel-statistics response until `release_stats` is called
    pub fn gate_stats(mut self) -> Self {
        self.gate_stats = true;
        self
    }

    pub fn fail_overlay(&self, area: AreaOfInterest, message: &str) {
        self.overlay_failures
            .lock()
            .unwrap()
            .insert(area, message.to_string());
    }

    pub fn fail_stats(&self, message: &str) {
        *self.stats_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_series(&self, message: &str) {
        *self.series_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Let the in-flight overlay request for `area` complete
    pub async fn release_overlay(&self, area: AreaOfInterest) {
        let sender = self.take_waiter(&self.overlay_waiters, |key| *key == area).await;
        let _ = sender.send(());
    }

    /// Let the in-flight statistics request for `point` complete
    pub async fn release_stats(&self, point: LatLng) {
        let sender = self.take_waiter(&self.stats_waiters, |key| *key == point).await;
        let _ = sender.send(());
    }

    async fn take_waiter<K>(
        &self,
        waiters: &Mutex<Vec<(K, oneshot::Sender<()>)>>,
        matches: impl Fn(&K) -> bool,
    ) -> oneshot::Sender<()> {
        let deadline = tokio::time::Instant::now() + SETTLE;
        loop {
            {
                let mut guard = waiters.lock().unwrap();
                if let Some(pos) = guard.iter().position(|(key, _)| matches(key)) {
                    return guard.remove(pos).1;
                }
            }
            if tokio::time::Instant::now() > deadline {
                panic!("timed out waiting for a gated request to arrive");
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub fn overlay_call_count(&self) -> usize {
        self.overlay_calls.lock().unwrap().len()
    }

    pub fn stats_call_count(&self) -> usize {
        self.stats_calls.lock().unwrap().len()
    }

    pub fn series_call_count(&self) -> usize {
        self.series_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl NdviGateway for MockGateway {
    async fn get_overlay(&self, area: AreaOfInterest) -> Result<OverlayDescription, GatewayError> {
        self.overlay_calls.lock().unwrap().push(area);

        if self.gate_overlays {
            let (tx, rx) = oneshot::channel();
            self.overlay_waiters.lock().unwrap().push((area, tx));
            let _ = rx.await;
        }

        match self.overlay_failures.lock().unwrap().get(&area) {
            Some(message) => Err(GatewayError::Backend(message.clone())),
            None => Ok(overlay_description_for(area)),
        }
    }

    async fn get_pixel_stats(&self, point: LatLng) -> Result<PixelQueryResult, GatewayError> {
        self.stats_calls.lock().unwrap().push(point);

        if self.gate_stats {
            let (tx, rx) = oneshot::channel();
            self.stats_waiters.lock().unwrap().push((point, tx));
            let _ = rx.await;
        }

        match self.stats_failure.lock().unwrap().as_ref() {
            Some(message) => Err(GatewayError::Backend(message.clone())),
            None => Ok(pixel_stats_for(point)),
        }
    }

    async fn get_time_series(&self, point: LatLng) -> Result<TimeSeriesResult, GatewayError> {
        self.series_calls.lock().unwrap().push(point);

        match self.series_failure.lock().unwrap().as_ref() {
            Some(message) => Err(GatewayError::Backend(message.clone())),
            None => Ok(time_series_for(point)),
        }
    }
}

// ============================================================================
// Mock surface
// ============================================================================

/// Z-index values the coordinator assigns, used to tell layers apart
pub const OVERLAY_Z: i32 = 1000;
pub const BASE_Z: i32 = 0;

/// Everything a mock surface was asked to do
#[derive(Default)]
pub struct SurfaceLog {
    next_layer_id: u64,
    /// Currently attached layers by raw id
    pub layers: HashMap<u64, TileLayerSpec>,
    pub opacity_calls: Vec<(u64, f64)>,
    pub fit_bounds_calls: Vec<LatLngBounds>,
    pub popups_opened: Vec<(LatLng, PopupContent)>,
    pub popup_updates: Vec<PopupContent>,
    pub click_handler: Option<ClickHandler>,
    pub destroyed: bool,
}

impl SurfaceLog {
    pub fn overlay_layers(&self) -> Vec<TileLayerSpec> {
        self.layers
            .values()
            .filter(|spec| spec.z_index == OVERLAY_Z)
            .cloned()
            .collect()
    }

    pub fn base_layers(&self) -> Vec<TileLayerSpec> {
        self.layers
            .values()
            .filter(|spec| spec.z_index == BASE_Z)
            .cloned()
            .collect()
    }
}

pub type SharedSurfaceLog = Arc<Mutex<SurfaceLog>>;

/// Simulate a user click on a mock surface
pub fn emit_click(log: &SharedSurfaceLog, point: LatLng) {
    let guard = log.lock().unwrap();
    let handler = guard
        .click_handler
        .as_ref()
        .expect("click handler installed");
    handler(point);
}

struct MockSurface {
    log: SharedSurfaceLog,
}

impl RenderingSurface for MockSurface {
    fn add_tile_layer(&mut self, spec: &TileLayerSpec) -> LayerId {
        let mut log = self.log.lock().unwrap();
        log.next_layer_id += 1;
        let id = log.next_layer_id;
        log.layers.insert(id, spec.clone());
        LayerId(id)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.log.lock().unwrap().layers.remove(&layer.0);
    }

    fn set_layer_opacity(&mut self, layer: LayerId, opacity: f64) {
        let mut log = self.log.lock().unwrap();
        if let Some(spec) = log.layers.get_mut(&layer.0) {
            spec.opacity = opacity;
        }
        log.opacity_calls.push((layer.0, opacity));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.log.lock().unwrap().fit_bounds_calls.push(bounds);
    }

    fn open_popup(&mut self, anchor: LatLng, content: PopupContent) {
        self.log.lock().unwrap().popups_opened.push((anchor, content));
    }

    fn update_popup(&mut self, content: PopupContent) {
        self.log.lock().unwrap().popup_updates.push(content);
    }

    fn set_click_handler(&mut self, handler: ClickHandler) {
        self.log.lock().unwrap().click_handler = Some(handler);
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.log.lock().unwrap().destroyed = true;
    }
}

/// Shared view into everything a factory produced
#[derive(Default)]
pub struct FactoryState {
    pub surfaces: Mutex<Vec<SharedSurfaceLog>>,
    pub fail: AtomicBool,
}

pub struct MockSurfaceFactory {
    state: Arc<FactoryState>,
}

impl MockSurfaceFactory {
    pub fn new() -> (Self, Arc<FactoryState>) {
        let state = Arc::new(FactoryState::default());
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl SurfaceFactory for MockSurfaceFactory {
    fn create(&self, _options: &SurfaceOptions) -> Result<Box<dyn RenderingSurface>, SurfaceError> {
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(SurfaceError::Construction(
                "factory told to fail".to_string(),
            ));
        }
        let log: SharedSurfaceLog = Arc::new(Mutex::new(SurfaceLog::default()));
        self.state.surfaces.lock().unwrap().push(log.clone());
        Ok(Box::new(MockSurface { log }))
    }
}

// ============================================================================
// Dashboard harness
// ============================================================================

pub struct TestDashboard {
    pub handle: DashboardHandle,
    pub gateway: Arc<MockGateway>,
    pub factory: Arc<FactoryState>,
}

pub fn test_config() -> Config {
    Config {
        init_delay: Duration::from_millis(1),
        ..Config::default()
    }
}

pub fn spawn_dashboard(gateway: MockGateway) -> TestDashboard {
    spawn_dashboard_with_config(gateway, test_config())
}

pub fn spawn_dashboard_with_config(gateway: MockGateway, config: Config) -> TestDashboard {
    let gateway = Arc::new(gateway);
    let (factory, factory_state) = MockSurfaceFactory::new();
    let handle = Coordinator::spawn(config, gateway.clone(), Box::new(factory));
    TestDashboard {
        handle,
        gateway,
        factory: factory_state,
    }
}

impl TestDashboard {
    /// Mount with defaults and wait for the initial overlay load to resolve
    pub async fn mount_and_settle(&self) -> SharedSurfaceLog {
        self.handle.mount(SurfaceOptions::default());
        self.handle
            .wait_for(SETTLE, |s| {
                !s.loading && (s.overlay.is_some() || s.error.is_some())
            })
            .await
            .expect("initial overlay load settles");
        self.surface()
    }

    /// The most recently created surface
    pub fn surface(&self) -> SharedSurfaceLog {
        self.factory
            .surfaces
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a surface was created")
    }

    /// Round-trip through the command channel, guaranteeing every previously
    /// sent command has been processed
    pub async fn barrier(&self) {
        let _ = self.handle.export_snapshot().await;
    }
}
