//! Headless smoke-run client
//!
//! Mounts the coordinator on a logging surface against a live NDVI backend,
//! waits for the initial overlay, optionally probes a point, and writes an
//! export snapshot. Useful for exercising a backend deployment end to end
//! without a browser.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use ndvi_dashboard::config::Config;
use ndvi_dashboard::coordinator::Coordinator;
use ndvi_dashboard::export;
use ndvi_dashboard::gateway::HttpNdviGateway;
use ndvi_dashboard::geo::LatLng;
use ndvi_dashboard::surface::{HeadlessSurfaceFactory, SurfaceOptions};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long the smoke run waits for any one state transition
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional probe coordinate from PROBE_LAT / PROBE_LNG
fn probe_point_from_env() -> Option<LatLng> {
    let lat = env::var("PROBE_LAT").ok()?.parse().ok()?;
    let lng = env::var("PROBE_LNG").ok()?.parse().ok()?;
    Some(LatLng::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ndvi_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: backend={}, initial area={}",
        config.api_base_url, config.initial.area
    );

    let gateway = Arc::new(HttpNdviGateway::new(&config)?);
    let export_dir = config.export_dir.clone();

    let handle = Coordinator::spawn(config, gateway, Box::new(HeadlessSurfaceFactory::new()));
    handle.mount(SurfaceOptions::default());

    // Wait for the initial overlay load to resolve either way
    let state = handle
        .wait_for(SETTLE_TIMEOUT, |s| {
            !s.loading && (s.overlay.is_some() || s.error.is_some())
        })
        .await?;

    match (&state.overlay, &state.error) {
        (Some(overlay), _) => info!(
            "Overlay loaded: {} ({} images, {} to {})",
            overlay.aoi_name,
            overlay.image_count,
            overlay.date_range.start,
            overlay.date_range.end
        ),
        (None, Some(error)) => warn!("Overlay load failed: {}", error),
        _ => {}
    }

    // Probe a point when one was requested
    if let Some(point) = probe_point_from_env() {
        info!("Probing pixel statistics at {}", point);
        handle.toggle_time_series();
        handle.click(point);

        match handle
            .wait_for(SETTLE_TIMEOUT, |s| {
                s.pixel_stats.as_ref().is_some_and(|p| p.point == point)
            })
            .await
        {
            Ok(state) => {
                if let Some(stats) = &state.pixel_stats {
                    info!(
                        "NDVI at {}: mean={}, min={}, max={}, std_dev={}",
                        point,
                        stats.statistics.mean,
                        stats.statistics.min,
                        stats.statistics.max,
                        stats.statistics.std_dev
                    );
                }
            }
            Err(e) => warn!("No pixel statistics for {}: {}", point, e),
        }
    }

    // Export a snapshot of whatever we ended up with
    let artifact = handle.export_snapshot().await?;
    let path = export::write_to_dir(&artifact, &export_dir)?;
    info!("Export snapshot written to {:?}", path);

    handle.unmount();
    handle.shutdown();
    Ok(())
}
