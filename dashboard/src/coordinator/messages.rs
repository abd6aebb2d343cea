//! Messages flowing into the coordinator task
//!
//! Commands come from the handle (user input and surface clicks); events are
//! completions of work the coordinator spawned. Every asynchronous
//! completion carries the key it was issued under (area or coordinate) so
//! stale responses are discardable.

use tokio::sync::oneshot;

use crate::catalog::{AreaOfInterest, BaseLayerKind};
use crate::export::ExportArtifact;
use crate::gateway::{GatewayError, OverlayDescription, PixelQueryResult, TimeSeriesResult};
use crate::geo::LatLng;
use crate::surface::SurfaceOptions;

pub(crate) enum Message {
    Command(Command),
    Event(Event),
}

pub(crate) enum Command {
    Mount { options: SurfaceOptions },
    Unmount,
    SelectArea(AreaOfInterest),
    SetBaseLayer(BaseLayerKind),
    SetOpacity(f64),
    ToggleOverlay,
    ToggleTimeSeries,
    ToggleStats,
    Click(LatLng),
    Export { reply: oneshot::Sender<ExportArtifact> },
    Shutdown,
}

#[derive(Debug)]
pub(crate) enum Event {
    /// The deferred surface-construction timer fired
    InitTimerFired { generation: u64 },
    OverlayLoaded {
        area: AreaOfInterest,
        result: Result<OverlayDescription, GatewayError>,
    },
    StatsLoaded {
        point: LatLng,
        result: Result<PixelQueryResult, GatewayError>,
    },
    SeriesLoaded {
        point: LatLng,
        result: Result<TimeSeriesResult, GatewayError>,
    },
}
