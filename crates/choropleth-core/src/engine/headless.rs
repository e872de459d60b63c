// crates/choropleth-core/src/engine/headless.rs
use super::{FeatureTarget, LayerHandle, MapEngine, MapHandle, PointerEvent, PointerEventKind};
use crate::config::{TileLayerConfig, ViewportConfig};
use crate::error::{MapError, Result};
use crate::feature::{Feature, LayerKind};
use crate::geometry::{Bounds, LatLng};
use crate::style::{Style, StrokeStyle};
use std::collections::BTreeMap;

/// Every call the engine received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateViewport { mount_target: String },
    AddTileLayer { layer: LayerHandle, url: String },
    AddPolygonLayer { layer: LayerHandle, kind: LayerKind, features: usize },
    Subscribe { target: FeatureTarget, events: Vec<PointerEventKind> },
    BindPopup { target: FeatureTarget, content: String },
    SetStroke { target: FeatureTarget, stroke: StrokeStyle },
    ClearLayer { layer: LayerHandle },
    FitBounds { bounds: Bounds },
    SetView { center: LatLng, zoom: u8 },
    Destroy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessViewport {
    pub handle: MapHandle,
    pub mount_target: String,
    pub center: LatLng,
    pub zoom: u8,
    /// Last bounds passed to `fit_bounds`; reset by `set_view`.
    pub fitted: Option<Bounds>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessFeature {
    pub kind: LayerKind,
    pub state_name: String,
    pub name: String,
    pub bounds: Option<Bounds>,
    pub style: Style,
    pub popup: Option<String>,
    pub events: Vec<PointerEventKind>,
}

/// `kind` is `None` for the tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLayer {
    pub handle: LayerHandle,
    pub kind: Option<LayerKind>,
    pub features: Vec<HeadlessFeature>,
}

/// In-memory [`MapEngine`] that records what a real engine would draw.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    next_id: u32,
    viewport: Option<HeadlessViewport>,
    layers: BTreeMap<LayerHandle, HeadlessLayer>,
    calls: Vec<EngineCall>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn is_live(&self, map: MapHandle) -> bool {
        self.viewport.as_ref().is_some_and(|v| v.handle == map)
    }

    fn feature_mut(&mut self, target: FeatureTarget) -> Option<&mut HeadlessFeature> {
        self.layers
            .get_mut(&target.layer)
            .and_then(|l| l.features.get_mut(target.index))
    }

    pub fn viewport(&self) -> Option<&HeadlessViewport> {
        self.viewport.as_ref()
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&HeadlessLayer> {
        self.layers.get(&handle)
    }

    /// Attached layers, bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &HeadlessLayer> {
        self.layers.values()
    }

    pub fn layers_of_kind(&self, kind: LayerKind) -> Vec<&HeadlessLayer> {
        self.layers().filter(|l| l.kind == Some(kind)).collect()
    }

    pub fn tile_layer_count(&self) -> usize {
        self.layers().filter(|l| l.kind.is_none()).count()
    }

    pub fn feature(&self, target: FeatureTarget) -> Option<&HeadlessFeature> {
        self.layers
            .get(&target.layer)
            .and_then(|l| l.features.get(target.index))
    }

    /// First rendered feature of `kind` called `name`.
    pub fn find_feature(&self, kind: LayerKind, name: &str) -> Option<FeatureTarget> {
        self.layers_of_kind(kind).into_iter().find_map(|l| {
            l.features
                .iter()
                .position(|f| f.name == name)
                .map(|i| FeatureTarget::new(l.handle, i))
        })
    }

    /// What a real engine would deliver for this pointer action: `None` if
    /// the feature is gone or not subscribed to `kind`.
    pub fn pointer(&self, kind: PointerEventKind, target: FeatureTarget) -> Option<PointerEvent> {
        self.feature(target)
            .filter(|f| f.events.contains(&kind))
            .map(|_| PointerEvent::new(kind, target))
    }
}

impl MapEngine for HeadlessEngine {
    fn create_viewport(
        &mut self,
        mount_target: &str,
        viewport: &ViewportConfig,
    ) -> Result<MapHandle> {
        if mount_target.trim().is_empty() {
            return Err(MapError::Engine("Map container not found.".into()));
        }
        if self.viewport.is_some() {
            return Err(MapError::Engine("Map container is already initialized.".into()));
        }
        let handle = MapHandle(self.next_id());
        self.calls.push(EngineCall::CreateViewport {
            mount_target: mount_target.to_string(),
        });
        self.viewport = Some(HeadlessViewport {
            handle,
            mount_target: mount_target.to_string(),
            center: viewport.center,
            zoom: viewport.zoom,
            fitted: None,
        });
        Ok(handle)
    }

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<LayerHandle> {
        if !self.is_live(map) {
            return Err(MapError::NotInitialized);
        }
        let handle = LayerHandle(self.next_id());
        let url = tiles.tile_url(0, 0, 0);
        self.calls.push(EngineCall::AddTileLayer { layer: handle, url });
        self.layers.insert(
            handle,
            HeadlessLayer {
                handle,
                kind: None,
                features: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn add_polygon_layer(
        &mut self,
        map: MapHandle,
        kind: LayerKind,
        features: &[(&Feature, Style)],
    ) -> Result<LayerHandle> {
        if !self.is_live(map) {
            return Err(MapError::NotInitialized);
        }
        let handle = LayerHandle(self.next_id());
        self.calls.push(EngineCall::AddPolygonLayer {
            layer: handle,
            kind,
            features: features.len(),
        });
        let features = features
            .iter()
            .map(|(f, style)| {
                let (state_name, county_name) = f.selection_names();
                let name = if f.is_zoomable() { state_name } else { county_name };
                HeadlessFeature {
                    kind,
                    state_name: state_name.to_string(),
                    name: name.to_string(),
                    bounds: f.bounds(),
                    style: style.clone(),
                    popup: None,
                    events: Vec::new(),
                }
            })
            .collect();
        self.layers.insert(
            handle,
            HeadlessLayer {
                handle,
                kind: Some(kind),
                features,
            },
        );
        Ok(handle)
    }

    fn subscribe(&mut self, target: FeatureTarget, events: &[PointerEventKind]) {
        let Some(feature) = self.feature_mut(target) else {
            return;
        };
        for e in events {
            if !feature.events.contains(e) {
                feature.events.push(*e);
            }
        }
        self.calls.push(EngineCall::Subscribe {
            target,
            events: events.to_vec(),
        });
    }

    fn bind_popup(&mut self, target: FeatureTarget, content: &str) {
        let Some(feature) = self.feature_mut(target) else {
            return;
        };
        feature.popup = Some(content.to_string());
        self.calls.push(EngineCall::BindPopup {
            target,
            content: content.to_string(),
        });
    }

    fn set_stroke(&mut self, target: FeatureTarget, stroke: &StrokeStyle) {
        let Some(feature) = self.feature_mut(target) else {
            return;
        };
        feature.style.apply_stroke(stroke);
        self.calls.push(EngineCall::SetStroke {
            target,
            stroke: stroke.clone(),
        });
    }

    fn clear_layer(&mut self, layer: LayerHandle) {
        if self.layers.remove(&layer).is_some() {
            self.calls.push(EngineCall::ClearLayer { layer });
        }
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: Bounds) {
        if !self.is_live(map) {
            return;
        }
        if let Some(v) = self.viewport.as_mut() {
            v.center = bounds.center();
            v.fitted = Some(bounds);
        }
        self.calls.push(EngineCall::FitBounds { bounds });
    }

    fn set_view(&mut self, map: MapHandle, center: LatLng, zoom: u8) {
        if !self.is_live(map) {
            return;
        }
        if let Some(v) = self.viewport.as_mut() {
            v.center = center;
            v.zoom = zoom;
            v.fitted = None;
        }
        self.calls.push(EngineCall::SetView { center, zoom });
    }

    fn destroy(&mut self, map: MapHandle) {
        if !self.is_live(map) {
            return;
        }
        self.viewport = None;
        self.layers.clear();
        self.calls.push(EngineCall::Destroy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    #[test]
    fn refuses_second_viewport_on_same_container() {
        let cfg = MapConfig::default();
        let mut engine = HeadlessEngine::new();
        engine.create_viewport("map", &cfg.viewport).unwrap();
        let err = engine.create_viewport("map", &cfg.viewport).unwrap_err();
        assert!(matches!(err, MapError::Engine(_)));
    }

    #[test]
    fn calls_on_dead_handles_are_ignored() {
        let cfg = MapConfig::default();
        let mut engine = HeadlessEngine::new();
        let map = engine.create_viewport("map", &cfg.viewport).unwrap();
        engine.destroy(map);
        engine.set_view(map, LatLng::new(0.0, 0.0), 9);
        engine.clear_layer(LayerHandle(42));
        engine.set_stroke(FeatureTarget::new(LayerHandle(42), 0), &crate::style::highlight_stroke());
        assert_eq!(engine.calls(), &[
            EngineCall::CreateViewport { mount_target: "map".into() },
            EngineCall::Destroy,
        ]);
        assert!(engine.add_tile_layer(map, &cfg.tiles).is_err());
    }
}
