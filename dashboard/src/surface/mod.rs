//! Rendering surface capability
//!
//! A thin abstraction over the interactive map widget: lifecycle and layer
//! mutation primitives only. The coordinator owns at most one surface and
//! talks to it exclusively through these traits; pan/zoom/tile-fetch
//! mechanics belong to the widget behind the boundary.

pub mod headless;
pub mod service;
pub mod types;

pub use headless::{HeadlessSurface, HeadlessSurfaceFactory};
pub use service::{ClickHandler, RenderingSurface, SurfaceFactory};
pub use types::{LayerId, PopupContent, SurfaceError, SurfaceOptions, TileLayerSpec};
