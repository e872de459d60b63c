// crates/choropleth-core/src/dataset.rs

//! # Datasets
//!
//! The three feature collections the map renders. They arrive already
//! parsed (a `serde_json::Value`, a JS object converted by
//! `serde-wasm-bindgen`, or a JSON string) and are converted exactly once
//! into typed [`Feature`]s. After that they are shared read-only behind an
//! `Arc` and never mutated.

use crate::error::{MapError, Result};
use crate::feature::{Feature, LayerKind};
use crate::geometry::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

/// Raw feature collection as it comes from the data source.
#[derive(Debug, Deserialize)]
pub struct FeatureCollectionRaw {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub features: Vec<FeatureRaw>,
}

/// Raw feature. Geometry stays untyped until conversion so that a single
/// point or line in a polygon dataset is skipped instead of failing the
/// whole collection.
#[derive(Debug, Deserialize)]
pub struct FeatureRaw {
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// A converted collection; every feature has the variant matching `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub kind: LayerKind,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_raw(kind: LayerKind, raw: FeatureCollectionRaw) -> Result<Self> {
        if let Some(t) = raw.kind.as_deref() {
            if t != "FeatureCollection" {
                return Err(MapError::Dataset(format!(
                    "{kind} dataset has type {t:?}, expected \"FeatureCollection\""
                )));
            }
        }

        let total = raw.features.len();
        let features: Vec<Feature> = raw
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let geometry = match f.geometry.map(serde_json::from_value::<Geometry>) {
                    Some(Ok(g)) => g,
                    Some(Err(e)) => {
                        tracing::warn!(layer = %kind, index = i, error = %e, "Skipping non-polygon feature");
                        return None;
                    }
                    None => {
                        tracing::warn!(layer = %kind, index = i, "Skipping feature without geometry");
                        return None;
                    }
                };
                Some(Feature::from_parts(kind, geometry, f.properties.unwrap_or_default()))
            })
            .collect();

        tracing::debug!(layer = %kind, loaded = features.len(), total, "Converted feature collection");
        Ok(Self { kind, features })
    }

    pub fn from_value(kind: LayerKind, value: Value) -> Result<Self> {
        let raw: FeatureCollectionRaw = serde_json::from_value(value)?;
        Self::from_raw(kind, raw)
    }

    pub fn from_json_str(kind: LayerKind, json: &str) -> Result<Self> {
        let raw: FeatureCollectionRaw = serde_json::from_str(json)?;
        Self::from_raw(kind, raw)
    }

    pub fn from_reader<R: Read>(kind: LayerKind, reader: R) -> Result<Self> {
        let raw: FeatureCollectionRaw = serde_json::from_reader(reader)?;
        Self::from_raw(kind, raw)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }
}

/// Feature counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub states: usize,
    pub counties: usize,
    pub services: usize,
}

/// The three collections the map is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub states: FeatureCollection,
    pub counties: FeatureCollection,
    pub services: FeatureCollection,
}

impl Datasets {
    pub fn from_values(states: Value, counties: Value, services: Value) -> Result<Self> {
        Ok(Self {
            states: FeatureCollection::from_value(LayerKind::States, states)?,
            counties: FeatureCollection::from_value(LayerKind::Counties, counties)?,
            services: FeatureCollection::from_value(LayerKind::Services, services)?,
        })
    }

    pub fn from_json_strs(states: &str, counties: &str, services: &str) -> Result<Self> {
        Ok(Self {
            states: FeatureCollection::from_json_str(LayerKind::States, states)?,
            counties: FeatureCollection::from_json_str(LayerKind::Counties, counties)?,
            services: FeatureCollection::from_json_str(LayerKind::Services, services)?,
        })
    }

    /// The bundled three-state sample (Colorado, Utah, Wyoming).
    #[cfg(feature = "sample-data")]
    pub fn sample() -> Result<Self> {
        Self::from_json_strs(
            include_str!("../data/sample/states.geojson"),
            include_str!("../data/sample/counties.geojson"),
            include_str!("../data/sample/services.geojson"),
        )
    }

    pub fn collection(&self, kind: LayerKind) -> &FeatureCollection {
        match kind {
            LayerKind::States => &self.states,
            LayerKind::Counties => &self.counties,
            LayerKind::Services => &self.services,
        }
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            states: self.states.len(),
            counties: self.counties.len(),
            services: self.services.len(),
        }
    }

    pub fn find_state(&self, name: &str) -> Option<(usize, &Feature)> {
        self.states
            .features
            .iter()
            .enumerate()
            .find(|(_, f)| matches!(f, Feature::State(r) if r.props.name == name))
    }

    /// Indices of the counties whose `STATE` equals `state_name`, in dataset
    /// order.
    pub fn county_indices_for_state(&self, state_name: &str) -> Vec<usize> {
        self.counties
            .features
            .iter()
            .enumerate()
            .filter(|(_, f)| county_belongs_to(f, state_name))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Inclusion predicate for the county layer of an activated state.
pub fn county_belongs_to(feature: &Feature, state_name: &str) -> bool {
    match feature {
        Feature::County(r) => r.props.state == state_name,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn poly() -> Value {
        json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] })
    }

    #[test]
    fn rejects_non_collection() {
        let err = FeatureCollection::from_value(LayerKind::States, json!({ "type": "Feature" }))
            .unwrap_err();
        assert!(matches!(err, MapError::Dataset(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = FeatureCollection::from_json_str(LayerKind::States, "{ nope").unwrap_err();
        assert!(matches!(err, MapError::Json(_)));
    }

    #[test]
    fn skips_features_without_polygon_geometry() {
        let fc = FeatureCollection::from_value(
            LayerKind::Counties,
            json!({
                "type": "FeatureCollection",
                "features": [
                    { "type": "Feature", "geometry": poly(), "properties": { "NAME": "A", "STATE": "X" } },
                    { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }, "properties": {} },
                    { "type": "Feature", "geometry": null, "properties": null }
                ]
            }),
        )
        .unwrap();
        assert_eq!(fc.len(), 1);
    }

    #[test]
    fn county_filter_is_exact_match_on_state() {
        let counties = json!({
            "type": "FeatureCollection",
            "features": [
                { "geometry": poly(), "properties": { "NAME": "A", "STATE": "Colorado" } },
                { "geometry": poly(), "properties": { "NAME": "B", "STATE": "Utah" } },
                { "geometry": poly(), "properties": { "NAME": "C", "STATE": "colorado" } },
                { "geometry": poly(), "properties": { "NAME": "D", "STATE": "Colorado" } },
                { "geometry": poly(), "properties": { "NAME": "E" } }
            ]
        });
        let empty = json!({ "type": "FeatureCollection", "features": [] });
        let ds = Datasets::from_values(empty.clone(), counties, empty).unwrap();
        assert_eq!(ds.county_indices_for_state("Colorado"), vec![0, 3]);
        assert_eq!(ds.county_indices_for_state("Nevada"), Vec::<usize>::new());
        assert_eq!(ds.county_indices_for_state(""), vec![4]);
    }

    #[cfg(feature = "sample-data")]
    #[test]
    fn sample_dataset_loads() {
        let ds = Datasets::sample().unwrap();
        let stats = ds.stats();
        assert_eq!(stats.states, 3);
        assert!(stats.counties >= 6);
        assert!(stats.services >= 2);
        assert!(ds.find_state("Colorado").is_some());
        assert!(!ds.county_indices_for_state("Utah").is_empty());
    }
}
