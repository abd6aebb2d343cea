//! Export snapshots
//!
//! Assembling a snapshot is a pure function of coordinator state plus a
//! timestamp; optional fields serialize as `null` rather than failing.
//! Writing the artifact to disk is the caller's concern.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::AreaOfInterest;
use crate::coordinator::DashboardState;
use crate::gateway::{OverlayDescription, PixelQueryResult, TimeSeriesResult};

/// Portable snapshot of the dashboard at one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub aoi: AreaOfInterest,
    pub timestamp: DateTime<Utc>,
    pub data: Option<OverlayDescription>,
    #[serde(rename = "pixelStats")]
    pub pixel_stats: Option<PixelQueryResult>,
    #[serde(rename = "timeSeries")]
    pub time_series: Option<TimeSeriesResult>,
}

impl ExportArtifact {
    /// `ndvi-dashboard-{aoi}-{yyyy-mm-dd}.json`
    pub fn filename(&self) -> String {
        format!(
            "ndvi-dashboard-{}-{}.json",
            self.aoi,
            self.timestamp.format("%Y-%m-%d")
        )
    }
}

/// Snapshot the current state, stamped with the current time
pub fn snapshot(state: &DashboardState) -> ExportArtifact {
    snapshot_at(state, Utc::now())
}

pub fn snapshot_at(state: &DashboardState, timestamp: DateTime<Utc>) -> ExportArtifact {
    ExportArtifact {
        aoi: state.selected_area,
        timestamp,
        data: state.overlay.clone(),
        pixel_stats: state.pixel_stats.clone(),
        time_series: state.time_series.clone(),
    }
}

/// Write a pretty-printed artifact into `dir` under its canonical filename
pub fn write_to_dir(artifact: &ExportArtifact, dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join(artifact.filename());
    let json = serde_json::to_vec_pretty(artifact)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
