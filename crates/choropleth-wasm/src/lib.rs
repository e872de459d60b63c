//! choropleth-wasm: browser bindings for choropleth-core on Leaflet
//!
//! Exposes one JS class, `ChoroplethMap`, that owns a [`MapSession`] and a
//! Leaflet-backed [`MapEngine`](choropleth_core::MapEngine). Leaflet itself
//! must already be loaded on the page as the global `L`.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { ChoroplethMap } from 'choropleth-wasm';
//!
//! async function main() {
//!   await init();
//!   const map = new ChoroplethMap({ tiles: { accessToken: 'pk.…' } });
//!   map.onSelectionChange((state, county) => {
//!     document.getElementById('state').textContent = state;
//!     document.getElementById('county').textContent = county;
//!   });
//!   map.mount('map');
//!   map.loadDatasets(states, counties, services);
//!   document.getElementById('reset').onclick = () => map.resetView();
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Pointer events arrive from Leaflet while no other call into the map is
//!   running; an event that lands during one is dropped.
//! - The selection callback runs after the session has been updated, so it
//!   may call back into the map.

mod engine;
mod leaflet;

pub use engine::LeafletEngine;

use choropleth_core::prelude::*;
use engine::to_js;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::result::Result;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing choropleth WASM module...".into());
}

fn to_js_error(err: MapError) -> JsValue {
    JsValue::from(js_sys::Error::new(&err.to_string()))
}

struct Inner {
    session: MapSession,
    engine: LeafletEngine,
    on_selection: Option<js_sys::Function>,
}

impl Inner {
    /// Applies the event and hands back what the selection listener needs,
    /// so it can be called once the borrow is released.
    fn dispatch(&mut self, event: PointerEvent) -> Option<(js_sys::Function, Selection)> {
        match self.session.handle_event(&mut self.engine, event) {
            Ok(true) => self
                .on_selection
                .clone()
                .map(|cb| (cb, self.session.selection().clone())),
            Ok(false) => None,
            Err(e) => {
                web_sys::console::error_1(&e.to_string().into());
                None
            }
        }
    }
}

fn notify(callback: &js_sys::Function, selection: &Selection) {
    let state = JsValue::from_str(&selection.state_name);
    let county = JsValue::from_str(&selection.county_name);
    if let Err(e) = callback.call2(&JsValue::NULL, &state, &county) {
        web_sys::console::error_2(&"Selection listener threw".into(), &e);
    }
}

/// A choropleth map bound to one DOM container.
#[wasm_bindgen]
pub struct ChoroplethMap {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl ChoroplethMap {
    /// `config` is a partial `MapConfig` (`{ viewport, tiles }`); missing
    /// fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChoroplethMap, JsValue> {
        let config: MapConfig = if config.is_undefined() || config.is_null() {
            MapConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate().map_err(to_js_error)?;

        let inner = Rc::new(RefCell::new(Inner {
            session: MapSession::new(config),
            engine: LeafletEngine::new(),
            on_selection: None,
        }));

        let weak = Rc::downgrade(&inner);
        inner
            .borrow_mut()
            .engine
            .set_dispatch(Rc::new(move |event: PointerEvent| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let pending = match inner.try_borrow_mut() {
                    Ok(mut inner) => inner.dispatch(event),
                    Err(_) => None,
                };
                if let Some((callback, selection)) = pending {
                    notify(&callback, &selection);
                }
            }));

        Ok(ChoroplethMap { inner })
    }

    /// Creates the Leaflet map in the element with id `element_id`.
    pub fn mount(&self, element_id: &str) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            session, engine, ..
        } = &mut *inner;
        session.mount(engine, element_id).map_err(to_js_error)?;
        Ok(())
    }

    /// Takes the three GeoJSON FeatureCollections as plain JS objects.
    #[wasm_bindgen(js_name = loadDatasets)]
    pub fn load_datasets(
        &self,
        states: JsValue,
        counties: JsValue,
        services: JsValue,
    ) -> Result<(), JsValue> {
        let datasets = Datasets::from_values(
            serde_wasm_bindgen::from_value(states)?,
            serde_wasm_bindgen::from_value(counties)?,
            serde_wasm_bindgen::from_value(services)?,
        )
        .map_err(to_js_error)?;
        self.install(datasets)
    }

    /// Loads the small dataset embedded in the module.
    #[cfg(feature = "sample-data")]
    #[wasm_bindgen(js_name = loadSampleDatasets)]
    pub fn load_sample_datasets(&self) -> Result<(), JsValue> {
        let datasets = Datasets::sample().map_err(to_js_error)?;
        self.install(datasets)
    }

    /// Registers `callback(stateName, countyName)`, called whenever the
    /// hover selection changes.
    #[wasm_bindgen(js_name = onSelectionChange)]
    pub fn on_selection_change(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().on_selection = Some(callback);
    }

    /// Recenters to the initial view and clears any county layer. Returns
    /// `false` when the map is not mounted.
    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            session, engine, ..
        } = &mut *inner;
        session.reset_view(engine)
    }

    /// `{ state, county }`
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().session.selection()).map_err(to_js_error)
    }

    /// `{ view: "overview" }` or `{ view: "state_activated", state_name }`
    #[wasm_bindgen(js_name = viewState)]
    pub fn view_state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().session.view_state()).map_err(to_js_error)
    }

    /// Feature counts per dataset, or `null` before any dataset is loaded.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let inner = self.inner.borrow();
        let stats = inner
            .session
            .controller()
            .datasets()
            .map(|d| d.stats());
        to_js(&stats).map_err(to_js_error)
    }

    /// Removes the map and every layer. The instance can be mounted again.
    pub fn unmount(&self) {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            session, engine, ..
        } = &mut *inner;
        session.unmount(engine);
    }
}

impl ChoroplethMap {
    fn install(&self, datasets: Datasets) -> Result<(), JsValue> {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            session, engine, ..
        } = &mut *inner;
        session
            .load_datasets(engine, Arc::new(datasets))
            .map_err(to_js_error)
    }
}
