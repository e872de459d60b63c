// crates/choropleth-core/src/error.rs
use thiserror::Error;

/// Errors surfaced by the map core.
///
/// Most failure modes of the map are guarded no-ops (double initialization,
/// a reset with no county layer, pointer events on a layer that has already
/// been cleared) and never reach this type. What remains are faults the host
/// has to see: the engine refusing to create a viewport, input collections
/// that are not feature collections at all, or an impossible configuration.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map engine rejected an operation (e.g. an invalid mount target).
    #[error("map engine error: {0}")]
    Engine(String),

    #[error("invalid dataset: {0}")]
    Dataset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layer operation was requested before the viewport exists.
    #[error("map is not initialized")]
    NotInitialized,
}

pub type Result<T> = std::result::Result<T, MapError>;
