// crates/choropleth-core/src/feature.rs

//! Typed features.
//!
//! The kind of a feature is fixed by the collection it was loaded from, not
//! sniffed from its property shape at hover time: a feature from the states
//! collection is a [`Feature::State`] even if it happens to carry a `NAME`.

use crate::geometry::{Bounds, Geometry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which of the three polygon layers a collection feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    States,
    Services,
    Counties,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::States => "states",
            LayerKind::Services => "services",
            LayerKind::Counties => "counties",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties read from a state feature (`name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateProps {
    pub name: String,
}

/// Properties read from a county feature (`NAME`, `STATE`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountyProps {
    pub name: String,
    pub state: String,
}

/// Properties read from a service-area feature (`NAME`, `STATE`, `COLOR`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceProps {
    pub name: String,
    pub state: String,
    pub color: String,
}

/// A feature's typed properties together with its geometry and the
/// untouched properties bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<P> {
    pub props: P,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

/// One polygon record, tagged by the dataset it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    State(Region<StateProps>),
    County(Region<CountyProps>),
    Service(Region<ServiceProps>),
}

impl Feature {
    /// Builds the variant for `kind`. Missing properties become empty
    /// strings.
    pub fn from_parts(kind: LayerKind, geometry: Geometry, properties: Map<String, Value>) -> Self {
        match kind {
            LayerKind::States => Feature::State(Region {
                props: StateProps {
                    name: prop_str(&properties, "name"),
                },
                geometry,
                properties,
            }),
            LayerKind::Counties => Feature::County(Region {
                props: CountyProps {
                    name: prop_str(&properties, "NAME"),
                    state: prop_str(&properties, "STATE"),
                },
                geometry,
                properties,
            }),
            LayerKind::Services => Feature::Service(Region {
                props: ServiceProps {
                    name: prop_str(&properties, "NAME"),
                    state: prop_str(&properties, "STATE"),
                    color: prop_str(&properties, "COLOR"),
                },
                geometry,
                properties,
            }),
        }
    }

    pub fn layer_kind(&self) -> LayerKind {
        match self {
            Feature::State(_) => LayerKind::States,
            Feature::County(_) => LayerKind::Counties,
            Feature::Service(_) => LayerKind::Services,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Feature::State(r) => &r.geometry,
            Feature::County(r) => &r.geometry,
            Feature::Service(r) => &r.geometry,
        }
    }

    pub fn properties(&self) -> &Map<String, Value> {
        match self {
            Feature::State(r) => &r.properties,
            Feature::County(r) => &r.properties,
            Feature::Service(r) => &r.properties,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry().bounds()
    }

    /// State features can be clicked to drill down; counties and service
    /// areas are informational only.
    pub fn is_zoomable(&self) -> bool {
        matches!(self, Feature::State(_))
    }

    /// The `(state, county)` pair reported to the selection display while
    /// this feature is highlighted. A county or service without `STATE`
    /// reports `("", NAME)`.
    pub fn selection_names(&self) -> (&str, &str) {
        match self {
            Feature::State(r) => (r.props.name.as_str(), ""),
            Feature::County(r) => (r.props.state.as_str(), r.props.name.as_str()),
            Feature::Service(r) => (r.props.state.as_str(), r.props.name.as_str()),
        }
    }

    /// Static popup label for county and service features. State features
    /// have none.
    pub fn popup_label(&self) -> Option<String> {
        let name = match self {
            Feature::State(_) => return None,
            Feature::County(r) => &r.props.name,
            Feature::Service(r) => &r.props.name,
        };
        Some(format!("County: {name}<br>Services: "))
    }

    /// The feature as a GeoJSON object, for engines that take GeoJSON.
    pub fn to_geojson(&self) -> Value {
        serde_json::json!({
            "type": "Feature",
            "geometry": self.geometry(),
            "properties": self.properties(),
        })
    }
}

/// Reads a string-ish property. Numbers are stringified (some county
/// datasets key `STATE` by FIPS code); anything else is empty.
fn prop_str(props: &Map<String, Value>, key: &str) -> String {
    match props.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
