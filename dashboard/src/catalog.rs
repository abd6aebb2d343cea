//! Static catalogs: selectable areas of interest and base map layers
//!
//! Both tables are fixed at build time and enumerated as closed enums. The
//! coordinator resolves bounds, tile templates, and attribution strings from
//! here; nothing in these tables is user-editable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geo::{LatLng, LatLngBounds};

/// A named, fixed geographic region the user can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaOfInterest {
    Nyc,
    Amazon,
    Sahara,
}

impl AreaOfInterest {
    pub const ALL: [AreaOfInterest; 3] = [
        AreaOfInterest::Nyc,
        AreaOfInterest::Amazon,
        AreaOfInterest::Sahara,
    ];

    /// Identifier used in backend request paths and export artifacts
    pub fn id(&self) -> &'static str {
        match self {
            AreaOfInterest::Nyc => "nyc",
            AreaOfInterest::Amazon => "amazon",
            AreaOfInterest::Sahara => "sahara",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AreaOfInterest::Nyc => "New York City",
            AreaOfInterest::Amazon => "Amazon Rainforest",
            AreaOfInterest::Sahara => "Sahara Desert",
        }
    }

    /// Fixed bounding box the viewport is fitted to after an overlay load
    pub fn bounds(&self) -> LatLngBounds {
        match self {
            AreaOfInterest::Nyc => {
                LatLngBounds::new(LatLng::new(40.5, -74.3), LatLng::new(40.9, -73.7))
            }
            AreaOfInterest::Amazon => {
                LatLngBounds::new(LatLng::new(-10.0, -70.0), LatLng::new(5.0, -50.0))
            }
            AreaOfInterest::Sahara => {
                LatLngBounds::new(LatLng::new(15.0, -10.0), LatLng::new(35.0, 30.0))
            }
        }
    }
}

impl fmt::Display for AreaOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AreaOfInterest {
    type Err = UnknownCatalogEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nyc" => Ok(AreaOfInterest::Nyc),
            "amazon" => Ok(AreaOfInterest::Amazon),
            "sahara" => Ok(AreaOfInterest::Sahara),
            _ => Err(UnknownCatalogEntry(s.to_string())),
        }
    }
}

/// Background tile source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayerKind {
    Standard,
    Satellite,
}

impl BaseLayerKind {
    pub fn tile_url_template(&self) -> &'static str {
        match self {
            BaseLayerKind::Standard => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayerKind::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            BaseLayerKind::Standard => "© OpenStreetMap contributors",
            BaseLayerKind::Satellite => {
                "Tiles © Esri — Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, \
                 Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community"
            }
        }
    }
}

impl fmt::Display for BaseLayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseLayerKind::Standard => f.write_str("standard"),
            BaseLayerKind::Satellite => f.write_str("satellite"),
        }
    }
}

impl FromStr for BaseLayerKind {
    type Err = UnknownCatalogEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(BaseLayerKind::Standard),
            "satellite" => Ok(BaseLayerKind::Satellite),
            _ => Err(UnknownCatalogEntry(s.to_string())),
        }
    }
}

/// Parse error for catalog identifiers
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown catalog entry: {0}")]
pub struct UnknownCatalogEntry(pub String);
