// crates/choropleth-core/src/config.rs

//! # Map Configuration
//!
//! Immutable viewport and base-tile settings handed to the
//! [`LayerController`](crate::controller::LayerController) at construction.
//! Every field has a default, and the structs deserialize with
//! `#[serde(default)]`, so a host may pass a partial object such as
//! `{ "tiles": { "access_token": "pk.…" } }`.

use crate::error::{MapError, Result};
use crate::geometry::LatLng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.8,
    lng: -96.0,
};
pub const DEFAULT_ZOOM: u8 = 4;
pub const DEFAULT_MIN_ZOOM: u8 = 4;
pub const DEFAULT_MAX_ZOOM: u8 = 19;

pub const DEFAULT_TILE_URI: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
pub const DEFAULT_TILE_ID: &str = "mapbox.light";
pub const DEFAULT_ATTRIBUTION: &str = "&copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, &copy; <a>MapBox</a>";

/// Top-level configuration for a map session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: ViewportConfig,
    pub tiles: TileLayerConfig,
}

impl MapConfig {
    /// Rejects viewports no engine could honour.
    ///
    /// An empty access token is accepted: the tile endpoint then serves
    /// blank tiles, which is a degraded but valid map.
    pub fn validate(&self) -> Result<()> {
        let v = &self.viewport;
        if v.min_zoom > v.max_zoom {
            return Err(MapError::InvalidConfig(format!(
                "min_zoom {} is greater than max_zoom {}",
                v.min_zoom, v.max_zoom
            )));
        }
        if !(v.min_zoom..=v.max_zoom).contains(&v.zoom) {
            return Err(MapError::InvalidConfig(format!(
                "zoom {} outside [{}, {}]",
                v.zoom, v.min_zoom, v.max_zoom
            )));
        }
        if !v.center.is_finite() {
            return Err(MapError::InvalidConfig("center is not finite".into()));
        }
        Ok(())
    }
}

/// Viewport options. Field names serialize to the option names Leaflet's
/// `L.map(id, options)` expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub zoom_control: bool,
    pub scroll_wheel_zoom: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_control: true,
            scroll_wheel_zoom: false,
        }
    }
}

/// The single raster base layer. `uri` is a template; `{id}` and
/// `{accessToken}` are substituted by the engine from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    pub uri: String,
    pub attribution: String,
    pub id: String,
    #[serde(alias = "accessToken")]
    pub access_token: String,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_TILE_URI.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            id: DEFAULT_TILE_ID.to_string(),
            access_token: String::new(),
        }
    }
}

impl TileLayerConfig {
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            ..self.clone()
        }
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Expands the URI template for one tile, the way the engine would.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.uri
            .replace("{id}", &self.id)
            .replace("{accessToken}", &self.access_token)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}
