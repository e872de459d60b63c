// crates/choropleth-wasm/src/engine.rs
use crate::leaflet;
use choropleth_core::engine::{
    FeatureTarget, LayerHandle, MapEngine, MapHandle, PointerEvent, PointerEventKind,
};
use choropleth_core::{
    Bounds, Feature, LatLng, LayerKind, MapError, Result, Style, StrokeStyle, TileLayerConfig,
    ViewportConfig,
};
use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Where pointer events go once Leaflet fires them.
pub type Dispatch = Rc<dyn Fn(PointerEvent)>;

/// Serializes with plain JS objects (not `Map`s), which is what Leaflet
/// option bags and GeoJSON need.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| MapError::Engine(e.to_string()))
}

pub fn js_error(err: JsValue) -> MapError {
    let message = match err.dyn_ref::<js_sys::Error>() {
        Some(e) => String::from(e.message()),
        None => err.as_string().unwrap_or_else(|| format!("{err:?}")),
    };
    MapError::Engine(message)
}

fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    attribution: &'a str,
    id: &'a str,
    access_token: &'a str,
}

#[derive(Serialize)]
struct GeoJsonOptions<'a> {
    style: &'a Style,
}

/// One rendered feature: its own `L.geoJSON` and the listeners it owns.
struct FeatureEntry {
    layer: leaflet::Layer,
    listeners: Vec<Closure<dyn FnMut(JsValue)>>,
}

struct PolygonLayer {
    group: leaflet::Layer,
    features: Vec<FeatureEntry>,
}

/// [`MapEngine`] on top of Leaflet.
///
/// Each feature is its own `L.geoJSON` inside a `featureGroup`, so
/// `FeatureTarget { layer, index }` addresses exactly one Leaflet layer for
/// styling, popups and event subscriptions.
#[derive(Default)]
pub struct LeafletEngine {
    next_id: u32,
    map: Option<(MapHandle, leaflet::Map)>,
    tiles: HashMap<LayerHandle, leaflet::Layer>,
    polygons: HashMap<LayerHandle, PolygonLayer>,
    dispatch: Option<Dispatch>,
}

impl LeafletEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = Some(dispatch);
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn live_map(&self, map: MapHandle) -> Option<&leaflet::Map> {
        match &self.map {
            Some((handle, m)) if *handle == map => Some(m),
            _ => None,
        }
    }

    fn entry(&self, target: FeatureTarget) -> Option<&FeatureEntry> {
        self.polygons
            .get(&target.layer)
            .and_then(|l| l.features.get(target.index))
    }
}

impl MapEngine for LeafletEngine {
    fn create_viewport(
        &mut self,
        mount_target: &str,
        viewport: &ViewportConfig,
    ) -> Result<MapHandle> {
        let options = to_js(viewport)?;
        let map = leaflet::create_map(mount_target, &options).map_err(js_error)?;
        let handle = MapHandle(self.next_id());
        self.map = Some((handle, map));
        Ok(handle)
    }

    fn add_tile_layer(&mut self, map: MapHandle, tiles: &TileLayerConfig) -> Result<LayerHandle> {
        let options = to_js(&TileOptions {
            attribution: &tiles.attribution,
            id: &tiles.id,
            access_token: &tiles.access_token,
        })?;
        let m = self.live_map(map).ok_or(MapError::NotInitialized)?;
        let layer = leaflet::tile_layer(&tiles.uri, &options);
        layer.add_to(m);
        let handle = LayerHandle(self.next_id());
        self.tiles.insert(handle, layer);
        Ok(handle)
    }

    fn add_polygon_layer(
        &mut self,
        map: MapHandle,
        kind: LayerKind,
        features: &[(&Feature, Style)],
    ) -> Result<LayerHandle> {
        let m = self.live_map(map).ok_or(MapError::NotInitialized)?;
        let group = leaflet::feature_group();
        let mut entries = Vec::with_capacity(features.len());
        for (feature, style) in features {
            let data = to_js(&feature.to_geojson())?;
            let options = to_js(&GeoJsonOptions { style })?;
            let layer = leaflet::geo_json(&data, &options).map_err(js_error)?;
            group.add_layer(&layer);
            entries.push(FeatureEntry {
                layer,
                listeners: Vec::new(),
            });
        }
        group.add_to(m);

        let handle = LayerHandle(self.next_id());
        web_sys::console::debug_1(&format!("{kind} layer: {} features", entries.len()).into());
        self.polygons.insert(
            handle,
            PolygonLayer {
                group,
                features: entries,
            },
        );
        Ok(handle)
    }

    fn subscribe(&mut self, target: FeatureTarget, events: &[PointerEventKind]) {
        let Some(dispatch) = self.dispatch.clone() else {
            warn("No event dispatcher installed; feature events are not bound");
            return;
        };
        let Some(entry) = self
            .polygons
            .get_mut(&target.layer)
            .and_then(|l| l.features.get_mut(target.index))
        else {
            return;
        };
        for &kind in events {
            let dispatch = dispatch.clone();
            let listener = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
                dispatch(PointerEvent::new(kind, target));
            });
            entry
                .layer
                .on(kind.dom_name(), listener.as_ref().unchecked_ref());
            entry.listeners.push(listener);
        }
    }

    fn bind_popup(&mut self, target: FeatureTarget, content: &str) {
        if let Some(entry) = self.entry(target) {
            entry.layer.bind_popup(content);
        }
    }

    fn set_stroke(&mut self, target: FeatureTarget, stroke: &StrokeStyle) {
        let Some(entry) = self.entry(target) else {
            return;
        };
        match to_js(stroke) {
            Ok(style) => {
                entry.layer.set_style(&style);
            }
            Err(e) => warn(&e.to_string()),
        }
    }

    fn clear_layer(&mut self, layer: LayerHandle) {
        // Listeners are dropped with the entry, after Leaflet lets go of them.
        if let Some(polygons) = self.polygons.remove(&layer) {
            polygons.group.clear_layers();
            polygons.group.remove_layer();
        }
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: Bounds) {
        let Some(m) = self.live_map(map) else {
            return;
        };
        match to_js(&bounds) {
            Ok(b) => {
                m.fit_bounds(&b);
            }
            Err(e) => warn(&e.to_string()),
        }
    }

    fn set_view(&mut self, map: MapHandle, center: LatLng, zoom: u8) {
        let Some(m) = self.live_map(map) else {
            return;
        };
        match to_js(&center) {
            Ok(c) => {
                m.set_view(&c, f64::from(zoom));
            }
            Err(e) => warn(&e.to_string()),
        }
    }

    fn destroy(&mut self, map: MapHandle) {
        if self.live_map(map).is_none() {
            return;
        }
        if let Some((_, m)) = self.map.take() {
            m.remove_map();
        }
        self.tiles.clear();
        self.polygons.clear();
    }
}
