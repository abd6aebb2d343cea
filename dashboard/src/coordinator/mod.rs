//! Visualization state coordinator
//!
//! The coordinator owns the rendering surface's lifecycle and the dashboard
//! state, mediates user-driven configuration changes against the data it
//! fetches from the NDVI backend, and sequences concurrent requests so
//! displayed state never regresses to stale data. It runs as a single task:
//! commands arrive from [`DashboardHandle`], completions of spawned fetches
//! arrive as keyed events on the same channel, and every state mutation is
//! published to presentation through a watch channel.

pub mod handle;
pub mod manager;
pub(crate) mod messages;
pub mod state;

pub use handle::{DashboardHandle, HandleError};
pub use manager::Coordinator;
pub use state::DashboardState;
