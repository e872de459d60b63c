// crates/choropleth-core/src/lib.rs

//! # choropleth-core
//!
//! State and layer management for a U.S. state/county drill-down
//! choropleth map. The crate decides *what* is on the map (a base tile
//! layer, a states layer, a colored services layer and at most one county
//! layer) and *how* pointer input changes it; a [`MapEngine`] does the
//! actual drawing.
//!
//! ```text
//!  Datasets ──► LayerController ──► MapEngine (Leaflet / headless)
//!                    ▲                   │ pointer events
//!                    └── interaction ◄───┘
//!                          │
//!                          └──► Selection  ──► selection display
//! ```

pub mod config;
pub mod controller;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod interaction;
pub mod selection;
pub mod session;
pub mod style;

// Re-exports
pub use crate::error::{MapError, Result};
pub use config::{MapConfig, TileLayerConfig, ViewportConfig};
pub use controller::{GeoLayer, LayerController};
pub use dataset::{DatasetStats, Datasets, FeatureCollection};
pub use engine::{
    FeatureTarget, HeadlessEngine, LayerHandle, MapEngine, MapHandle, PointerEvent,
    PointerEventKind,
};
pub use feature::{Feature, LayerKind};
pub use geometry::{Bounds, Geometry, LatLng};
pub use selection::Selection;
pub use session::{MapSession, ViewState};
pub use style::{Style, StrokeStyle};

pub mod prelude {
    pub use crate::config::{MapConfig, TileLayerConfig, ViewportConfig};
    pub use crate::controller::{GeoLayer, LayerController};
    pub use crate::dataset::{DatasetStats, Datasets};
    pub use crate::engine::{
        FeatureTarget, HeadlessEngine, LayerHandle, MapEngine, MapHandle, PointerEvent,
        PointerEventKind,
    };
    pub use crate::error::{MapError, Result};
    pub use crate::feature::{Feature, LayerKind};
    pub use crate::geometry::{Bounds, LatLng};
    pub use crate::selection::Selection;
    pub use crate::session::{MapSession, ViewState};
}
