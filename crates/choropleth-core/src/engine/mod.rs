// crates/choropleth-core/src/engine/mod.rs

//! # Map Engine seam
//!
//! The map core never renders anything itself. Everything visual goes
//! through [`MapEngine`], implemented by the browser bindings on top of
//! Leaflet and by [`HeadlessEngine`] for tests and offline walkthroughs.
//!
//! Pointer input flows the other way: the engine only delivers the
//! [`PointerEventKind`]s a feature was [`subscribed`](MapEngine::subscribe)
//! to, as [`PointerEvent`]s the host passes to
//! [`MapSession::handle_event`](crate::session::MapSession::handle_event).

use crate::config::{TileLayerConfig, ViewportConfig};
use crate::error::Result;
use crate::feature::{Feature, LayerKind};
use crate::geometry::{Bounds, LatLng};
use crate::style::{Style, StrokeStyle};
use serde::{Deserialize, Serialize};

mod headless;

pub use headless::{EngineCall, HeadlessEngine, HeadlessFeature, HeadlessLayer, HeadlessViewport};

/// Live viewport issued by [`MapEngine::create_viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapHandle(pub u32);

/// A tile or polygon layer attached to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerHandle(pub u32);

/// One rendered feature: its layer and its position in that layer's
/// render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureTarget {
    pub layer: LayerHandle,
    pub index: usize,
}

impl FeatureTarget {
    pub fn new(layer: LayerHandle, index: usize) -> Self {
        Self { layer, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    Click,
    PointerEnter,
    PointerLeave,
}

impl PointerEventKind {
    /// Leaflet event name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            PointerEventKind::Click => "click",
            PointerEventKind::PointerEnter => "mouseover",
            PointerEventKind::PointerLeave => "mouseout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: FeatureTarget,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, target: FeatureTarget) -> Self {
        Self { kind, target }
    }
}

/// Primitives the map core needs from a mapping library.
///
/// Calls on handles the engine no longer knows about (a destroyed map, a
/// cleared layer) must be ignored rather than fail.
///
/// # Examples
///
/// ```rust
/// use choropleth_core::engine::{HeadlessEngine, MapEngine};
/// use choropleth_core::config::MapConfig;
///
/// let cfg = MapConfig::default();
/// let mut engine = HeadlessEngine::new();
/// let map = engine.create_viewport("map", &cfg.viewport).unwrap();
/// engine.add_tile_layer(map, &cfg.tiles).unwrap();
/// assert_eq!(engine.viewport().unwrap().zoom, 4);
/// assert!(engine.create_viewport("", &cfg.viewport).is_err());
/// ```
pub trait MapEngine {
    /// Creates the viewport inside `mount_target`. Fails with
    /// [`MapError::Engine`](crate::MapError::Engine) when the target is not
    /// a usable mount point.
    fn create_viewport(&mut self, mount_target: &str, viewport: &ViewportConfig)
        -> Result<MapHandle>;

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<LayerHandle>;

    /// Renders `features` (each with its initial style) as one layer on top
    /// of everything attached so far. Feature `i` of the slice becomes
    /// `FeatureTarget { layer, index: i }`.
    fn add_polygon_layer(
        &mut self,
        map: MapHandle,
        kind: LayerKind,
        features: &[(&Feature, Style)],
    ) -> Result<LayerHandle>;

    fn subscribe(&mut self, target: FeatureTarget, events: &[PointerEventKind]);

    fn bind_popup(&mut self, target: FeatureTarget, content: &str);

    fn set_stroke(&mut self, target: FeatureTarget, stroke: &StrokeStyle);

    /// Removes every feature of `layer` and detaches it. The handle is dead
    /// afterwards.
    fn clear_layer(&mut self, layer: LayerHandle);

    fn fit_bounds(&mut self, map: MapHandle, bounds: Bounds);

    fn set_view(&mut self, map: MapHandle, center: LatLng, zoom: u8);

    fn destroy(&mut self, map: MapHandle);
}
