// crates/choropleth-core/src/controller.rs

//! # Layer Controller
//!
//! Owns the map handle and every polygon layer, and decides when each one
//! is attached:
//!
//! - the base tile layer, once, when the viewport is created;
//! - the states and services layers, together, the moment both the
//!   datasets and the viewport exist (one-shot readiness check);
//! - the county layer, on demand, for one activated state at a time.

use crate::config::MapConfig;
use crate::dataset::Datasets;
use crate::engine::{FeatureTarget, LayerHandle, MapEngine, MapHandle};
use crate::error::{MapError, Result};
use crate::feature::{Feature, LayerKind};
use crate::interaction;
use crate::style::rule_for;
use std::sync::Arc;

/// An attached polygon layer and the dataset indices it renders, in render
/// order (so `members[target.index]` is the dataset index of a target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLayer {
    handle: LayerHandle,
    kind: LayerKind,
    members: Vec<usize>,
}

impl GeoLayer {
    pub fn handle(&self) -> LayerHandle {
        self.handle
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = FeatureTarget> + '_ {
        (0..self.members.len()).map(|i| FeatureTarget::new(self.handle, i))
    }
}

#[derive(Debug)]
pub struct LayerController {
    config: MapConfig,
    map: Option<MapHandle>,
    tile_layer: Option<LayerHandle>,
    datasets: Option<Arc<Datasets>>,
    states_layer: Option<GeoLayer>,
    services_layer: Option<GeoLayer>,
    county_layer: Option<GeoLayer>,
}

impl LayerController {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            map: None,
            tile_layer: None,
            datasets: None,
            states_layer: None,
            services_layer: None,
            county_layer: None,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn map(&self) -> Option<MapHandle> {
        self.map
    }

    pub fn tile_layer(&self) -> Option<LayerHandle> {
        self.tile_layer
    }

    pub fn datasets(&self) -> Option<&Arc<Datasets>> {
        self.datasets.as_ref()
    }

    pub fn states_layer(&self) -> Option<&GeoLayer> {
        self.states_layer.as_ref()
    }

    pub fn services_layer(&self) -> Option<&GeoLayer> {
        self.services_layer.as_ref()
    }

    pub fn county_layer(&self) -> Option<&GeoLayer> {
        self.county_layer.as_ref()
    }

    fn layers(&self) -> impl Iterator<Item = &GeoLayer> {
        [&self.states_layer, &self.services_layer, &self.county_layer]
            .into_iter()
            .flatten()
    }

    pub fn layer_kind_of(&self, handle: LayerHandle) -> Option<LayerKind> {
        self.layers().find(|l| l.handle == handle).map(|l| l.kind)
    }

    /// The dataset feature behind a rendered target, or `None` if the
    /// target belongs to a layer that has since been cleared.
    pub fn feature_at(&self, target: FeatureTarget) -> Option<&Feature> {
        let layer = self.layers().find(|l| l.handle == target.layer)?;
        let index = *layer.members.get(target.index)?;
        self.datasets.as_ref()?.collection(layer.kind).get(index)
    }

    /// Creates the viewport and the base tile layer. A second call returns
    /// the existing handle without touching the engine.
    pub fn initialize<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        mount_target: &str,
    ) -> Result<MapHandle> {
        if let Some(map) = self.map {
            tracing::debug!(?map, "Map already initialized");
            return Ok(map);
        }

        let map = engine.create_viewport(mount_target, &self.config.viewport)?;
        self.map = Some(map);
        self.tile_layer = Some(engine.add_tile_layer(map, &self.config.tiles)?);
        if !self.config.tiles.has_access_token() {
            tracing::warn!("No tile access token configured; base tiles will be blank");
        }
        tracing::debug!(?map, mount_target, "Map initialized");

        self.on_ready(engine)?;
        Ok(map)
    }

    /// Hands the static datasets to the controller. They are fixed for the
    /// lifetime of the rendered layers: once the base layers exist, a new
    /// set is ignored.
    pub fn load_datasets<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        datasets: Arc<Datasets>,
    ) -> Result<()> {
        if self.states_layer.is_some() {
            tracing::warn!("Base layers already rendered; ignoring new datasets");
            return Ok(());
        }
        let stats = datasets.stats();
        tracing::debug!(
            states = stats.states,
            counties = stats.counties,
            services = stats.services,
            "Datasets loaded"
        );
        self.datasets = Some(datasets);
        self.on_ready(engine)
    }

    /// Readiness check, run only when the map or the datasets arrive.
    fn on_ready<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> Result<()> {
        if self.map.is_some() && self.datasets.is_some() {
            self.attach_base_layers(engine)?;
        }
        Ok(())
    }

    /// Attaches the states layer, then the services layer on top of it.
    /// Returns `false` if they already exist or the map or datasets are
    /// still missing.
    pub fn attach_base_layers<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> Result<bool> {
        if self.states_layer.is_some() || self.map.is_none() {
            return Ok(false);
        }
        let Some(datasets) = self.datasets.clone() else {
            return Ok(false);
        };

        let all_states = (0..datasets.states.len()).collect();
        self.states_layer = Some(self.attach_layer(engine, LayerKind::States, all_states)?);
        let all_services = (0..datasets.services.len()).collect();
        self.services_layer = Some(self.attach_layer(engine, LayerKind::Services, all_services)?);

        tracing::debug!(
            states = datasets.states.len(),
            services = datasets.services.len(),
            "Base layers attached"
        );
        Ok(true)
    }

    /// Replaces the county layer with the counties of `state_name`.
    ///
    /// No matching county yields an empty layer, which is still attached.
    pub fn attach_county_layer<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        state_name: &str,
    ) -> Result<&GeoLayer> {
        if self.map.is_none() {
            return Err(MapError::NotInitialized);
        }
        let members = match &self.datasets {
            Some(ds) => ds.county_indices_for_state(state_name),
            None => Vec::new(),
        };

        self.clear_county_layer(engine);
        let layer = self.attach_layer(engine, LayerKind::Counties, members)?;
        tracing::debug!(state = state_name, counties = layer.len(), "County layer attached");
        Ok(&*self.county_layer.insert(layer))
    }

    /// Returns whether a county layer was removed.
    pub fn clear_county_layer<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        match self.county_layer.take() {
            Some(layer) => {
                engine.clear_layer(layer.handle);
                tracing::trace!(layer = ?layer.handle, "County layer cleared");
                true
            }
            None => false,
        }
    }

    /// Back to the overview: initial center and zoom, no county layer.
    /// The viewport is recentered even when no state was activated; only
    /// the county clear is skipped then. Returns `false` without a map.
    pub fn reset_view<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        let Some(map) = self.map else {
            return false;
        };
        let viewport = &self.config.viewport;
        engine.set_view(map, viewport.center, viewport.zoom);
        if !self.clear_county_layer(engine) {
            tracing::trace!("Reset without a county layer; nothing to clear");
        }
        tracing::debug!("View reset to overview");
        true
    }

    /// Destroys the map and forgets every layer. Datasets are kept so a
    /// later `initialize` renders the same map again.
    pub fn teardown<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        let Some(map) = self.map.take() else {
            tracing::debug!("Teardown without a map; nothing to do");
            return;
        };
        engine.destroy(map);
        self.tile_layer = None;
        self.states_layer = None;
        self.services_layer = None;
        self.county_layer = None;
        tracing::debug!(?map, "Map destroyed");
    }

    fn attach_layer<E: MapEngine + ?Sized>(
        &self,
        engine: &mut E,
        kind: LayerKind,
        members: Vec<usize>,
    ) -> Result<GeoLayer> {
        let map = self.map.ok_or(MapError::NotInitialized)?;
        let datasets = self.datasets.as_ref().ok_or(MapError::NotInitialized)?;
        let collection = datasets.collection(kind);
        let rule = rule_for(kind);

        let features: Vec<(&Feature, _)> = members
            .iter()
            .filter_map(|&i| collection.get(i))
            .map(|f| (f, rule(f)))
            .collect();
        let handle = engine.add_polygon_layer(map, kind, &features)?;

        for (index, (feature, _)) in features.iter().enumerate() {
            interaction::on_feature_ready(engine, FeatureTarget::new(handle, index), feature);
        }

        Ok(GeoLayer {
            handle,
            kind,
            members,
        })
    }
}
