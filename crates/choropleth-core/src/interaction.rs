// crates/choropleth-core/src/interaction.rs

//! # Interaction Handler
//!
//! Plain functions that turn pointer events on rendered features into
//! selection updates and layer transitions. All state they touch is passed
//! in explicitly: the [`LayerController`], the [`Selection`] and the engine.
//!
//! Features come in two flavours, decided by the dataset they were loaded
//! from: zoomable state features (click drills down) and informational
//! county/service features (hover plus a static popup).

use crate::controller::LayerController;
use crate::engine::{FeatureTarget, MapEngine, PointerEventKind};
use crate::error::Result;
use crate::feature::Feature;
use crate::selection::Selection;
use crate::style::{highlight_stroke, resting_stroke};

const STATE_EVENTS: [PointerEventKind; 3] = [
    PointerEventKind::Click,
    PointerEventKind::PointerEnter,
    PointerEventKind::PointerLeave,
];

const INFO_EVENTS: [PointerEventKind; 2] =
    [PointerEventKind::PointerEnter, PointerEventKind::PointerLeave];

/// Per-feature binding hook, called once for every feature a layer renders.
pub fn on_feature_ready<E: MapEngine + ?Sized>(
    engine: &mut E,
    target: FeatureTarget,
    feature: &Feature,
) {
    if feature.is_zoomable() {
        on_state_feature_ready(engine, target);
    } else {
        on_informational_feature_ready(engine, target, feature);
    }
}

pub fn on_state_feature_ready<E: MapEngine + ?Sized>(engine: &mut E, target: FeatureTarget) {
    engine.subscribe(target, &STATE_EVENTS);
}

/// Hover bindings plus a popup label shown on demand. The label is built
/// once from the feature's `NAME`; a missing name leaves it blank.
pub fn on_informational_feature_ready<E: MapEngine + ?Sized>(
    engine: &mut E,
    target: FeatureTarget,
    feature: &Feature,
) {
    engine.subscribe(target, &INFO_EVENTS);
    if let Some(label) = feature.popup_label() {
        engine.bind_popup(target, &label);
    }
}

/// Drill-down: fit the viewport to the clicked state, then replace the
/// county layer with that state's counties.
///
/// Returns the activated state's name, or `None` when the target is not a
/// live state feature.
pub fn handle_zoom_to_state<E: MapEngine + ?Sized>(
    controller: &mut LayerController,
    engine: &mut E,
    target: FeatureTarget,
) -> Result<Option<String>> {
    let (state_name, bounds) = match controller.feature_at(target) {
        Some(Feature::State(r)) => (r.props.name.clone(), r.geometry.bounds()),
        _ => {
            tracing::trace!(?target, "Click on a non-state or stale feature; ignoring");
            return Ok(None);
        }
    };
    let Some(map) = controller.map() else {
        return Ok(None);
    };

    if let Some(bounds) = bounds {
        engine.fit_bounds(map, bounds);
    }
    controller.clear_county_layer(engine);
    controller.attach_county_layer(engine, &state_name)?;

    tracing::debug!(state = %state_name, "Zoomed to state");
    Ok(Some(state_name))
}

/// Emphasizes the feature's outline and points the selection at it.
/// Returns whether the selection changed.
pub fn handle_highlight<E: MapEngine + ?Sized>(
    controller: &LayerController,
    engine: &mut E,
    selection: &mut Selection,
    target: FeatureTarget,
) -> bool {
    let Some(feature) = controller.feature_at(target) else {
        return false;
    };
    engine.set_stroke(target, &highlight_stroke());
    selection.highlight(feature)
}

/// Restores the feature's resting outline and clears the selection,
/// whichever feature the pointer left. Returns whether the selection
/// changed.
pub fn handle_unhighlight<E: MapEngine + ?Sized>(
    controller: &LayerController,
    engine: &mut E,
    selection: &mut Selection,
    target: FeatureTarget,
) -> bool {
    if let Some(feature) = controller.feature_at(target) {
        engine.set_stroke(target, &resting_stroke(feature));
    }
    selection.clear()
}
