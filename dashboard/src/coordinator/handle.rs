//! Public handle to a running coordinator

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use super::messages::{Command, Message};
use super::state::DashboardState;
use crate::catalog::{AreaOfInterest, BaseLayerKind};
use crate::export::ExportArtifact;
use crate::geo::LatLng;
use crate::surface::SurfaceOptions;

/// Errors observable through the handle
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("dashboard coordinator has shut down")]
    Closed,

    #[error("timed out waiting for dashboard state")]
    Timeout,
}

/// Cloneable handle for driving a [`super::Coordinator`] and observing its
/// state. Commands are fire-and-forget; state flows back through the watch
/// channel. Commands sent after the coordinator stopped are dropped.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::UnboundedSender<Message>,
    state: watch::Receiver<DashboardState>,
}

impl DashboardHandle {
    pub(crate) fn new(
        tx: mpsc::UnboundedSender<Message>,
        state: watch::Receiver<DashboardState>,
    ) -> Self {
        Self { tx, state }
    }

    fn send(&self, command: Command) {
        let _ = self.tx.send(Message::Command(command));
    }

    /// Create (or re-create) the rendering surface bound to a container
    pub fn mount(&self, options: SurfaceOptions) {
        self.send(Command::Mount { options });
    }

    /// Tear down the surface and discard surface-derived state
    pub fn unmount(&self) {
        self.send(Command::Unmount);
    }

    pub fn select_area(&self, area: AreaOfInterest) {
        self.send(Command::SelectArea(area));
    }

    pub fn set_base_layer(&self, kind: BaseLayerKind) {
        self.send(Command::SetBaseLayer(kind));
    }

    /// Set overlay opacity; values outside [0, 1] are clamped
    pub fn set_opacity(&self, opacity: f64) {
        self.send(Command::SetOpacity(opacity));
    }

    pub fn toggle_overlay(&self) {
        self.send(Command::ToggleOverlay);
    }

    pub fn toggle_time_series(&self) {
        self.send(Command::ToggleTimeSeries);
    }

    pub fn toggle_stats(&self) {
        self.send(Command::ToggleStats);
    }

    /// Probe the overlay at a coordinate, as if the surface had been clicked
    pub fn click(&self, point: LatLng) {
        self.send(Command::Click(point));
    }

    /// Assemble an export snapshot of the current state
    pub async fn export_snapshot(&self) -> Result<ExportArtifact, HandleError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Command(Command::Export { reply }))
            .map_err(|_| HandleError::Closed)?;
        rx.await.map_err(|_| HandleError::Closed)
    }

    /// Current state snapshot
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies a predicate
    pub async fn wait_for(
        &self,
        timeout: Duration,
        mut predicate: impl FnMut(&DashboardState) -> bool,
    ) -> Result<DashboardState, HandleError> {
        let mut rx = self.state.clone();
        match tokio::time::timeout(timeout, rx.wait_for(|state| predicate(state))).await {
            Ok(Ok(state)) => Ok(state.clone()),
            Ok(Err(_)) => Err(HandleError::Closed),
            Err(_) => Err(HandleError::Timeout),
        }
    }

    /// Stop the coordinator
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }
}
