//! Dashboard configuration
//!
//! Configuration is loaded from environment variables; every field has a
//! working default so the dashboard runs against a local backend with no
//! setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{AreaOfInterest, BaseLayerKind};

/// Main dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NDVI backend base URL
    pub api_base_url: String,
    /// Bounded timeout applied to every backend request
    pub request_timeout: Duration,
    /// Delay between mount and actual surface construction, letting the
    /// display container finish layout first
    pub init_delay: Duration,
    /// Directory export snapshots are written to
    pub export_dir: PathBuf,
    /// State the coordinator starts from
    pub initial: InitialState,
}

/// Initial coordinator state
#[derive(Debug, Clone)]
pub struct InitialState {
    pub area: AreaOfInterest,
    pub base_layer: BaseLayerKind,
    pub opacity: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout: Duration::from_secs(15),
            init_delay: Duration::from_millis(100),
            export_dir: PathBuf::from("."),
            initial: InitialState::default(),
        }
    }
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            area: AreaOfInterest::Nyc,
            base_layer: BaseLayerKind::Standard,
            opacity: 0.9,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("API_BASE_URL")
            && !url.is_empty()
        {
            config.api_base_url = url;
        }
        if let Ok(val) = env::var("REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(val) = env::var("SURFACE_INIT_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.init_delay = Duration::from_millis(ms);
        }
        if let Ok(dir) = env::var("EXPORT_DIR")
            && !dir.is_empty()
        {
            config.export_dir = PathBuf::from(dir);
        }

        if let Ok(val) = env::var("INITIAL_AOI")
            && let Ok(area) = val.parse()
        {
            config.initial.area = area;
        }
        if let Ok(val) = env::var("INITIAL_BASE_LAYER")
            && let Ok(kind) = val.parse()
        {
            config.initial.base_layer = kind;
        }
        if let Ok(val) = env::var("INITIAL_OPACITY")
            && let Ok(opacity) = val.parse::<f64>()
        {
            config.initial.opacity = opacity.clamp(0.0, 1.0);
        }

        config
    }
}
