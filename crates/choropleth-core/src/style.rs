// crates/choropleth-core/src/style.rs

//! Per-layer style rules.
//!
//! A style rule is a plain `fn(&Feature) -> Style`. Hover feedback only
//! touches the stroke, so [`StrokeStyle`] is split out: highlighting applies
//! [`highlight_stroke`], unhighlighting re-applies the stroke of the rule the
//! feature was rendered with.

use crate::feature::{Feature, LayerKind};
use serde::{Deserialize, Serialize};

pub const OUTLINE_COLOR: &str = "#54585a";
pub const BASE_WEIGHT: f64 = 2.0;
pub const HIGHLIGHT_WEIGHT: f64 = 5.0;
pub const DASHED: &str = "3";

/// Full visual style of a feature. Serializes to Leaflet path options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill_color: String,
    pub fill_opacity: f64,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
}

/// Outline part of a [`Style`]. `dash_array: None` leaves the engine's
/// current dash untouched; `Some("")` forces a solid line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub weight: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dash_array: Option<String>,
}

impl StrokeStyle {
    fn dashed() -> Self {
        Self {
            weight: BASE_WEIGHT,
            color: OUTLINE_COLOR.to_string(),
            dash_array: Some(DASHED.to_string()),
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.dash_array.as_deref().is_some_and(|d| !d.is_empty())
    }
}

pub type StyleRule = fn(&Feature) -> Style;

pub fn state_style(_feature: &Feature) -> Style {
    Style {
        fill_color: "white".to_string(),
        fill_opacity: 1.0,
        stroke: StrokeStyle::dashed(),
    }
}

/// Service areas are filled with their own `COLOR`.
pub fn service_style(feature: &Feature) -> Style {
    let fill_color = match feature {
        Feature::Service(r) => r.props.color.clone(),
        _ => String::new(),
    };
    Style {
        fill_color,
        fill_opacity: 1.0,
        stroke: StrokeStyle {
            weight: BASE_WEIGHT,
            color: OUTLINE_COLOR.to_string(),
            dash_array: None,
        },
    }
}

/// Near-transparent fill so the state and service layers show through.
pub fn county_style(_feature: &Feature) -> Style {
    Style {
        fill_color: "white".to_string(),
        fill_opacity: 0.1,
        stroke: StrokeStyle::dashed(),
    }
}

pub fn rule_for(kind: LayerKind) -> StyleRule {
    match kind {
        LayerKind::States => state_style,
        LayerKind::Services => service_style,
        LayerKind::Counties => county_style,
    }
}

/// Emphasized solid outline shown while the pointer is over a feature.
pub fn highlight_stroke() -> StrokeStyle {
    StrokeStyle {
        weight: HIGHLIGHT_WEIGHT,
        color: OUTLINE_COLOR.to_string(),
        dash_array: Some(String::new()),
    }
}

/// The stroke the feature had before it was highlighted.
pub fn resting_stroke(feature: &Feature) -> StrokeStyle {
    rule_for(feature.layer_kind())(feature).stroke
}

impl Style {
    /// Merges a stroke into this style the way `setStyle` does: a missing
    /// dash keeps the current one, an empty dash means solid.
    pub fn apply_stroke(&mut self, stroke: &StrokeStyle) {
        self.stroke.weight = stroke.weight;
        self.stroke.color.clone_from(&stroke.color);
        if let Some(dash) = &stroke.dash_array {
            self.stroke.dash_array = (!dash.is_empty()).then(|| dash.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use serde_json::json;

    fn feature(kind: LayerKind, props: serde_json::Value) -> Feature {
        Feature::from_parts(
            kind,
            Geometry::Polygon(vec![]),
            props.as_object().cloned().unwrap_or_default(),
        )
    }

    #[test]
    fn state_rule() {
        let s = state_style(&feature(LayerKind::States, json!({ "name": "Utah" })));
        assert_eq!(s.fill_color, "white");
        assert_eq!(s.fill_opacity, 1.0);
        assert_eq!(s.stroke.weight, 2.0);
        assert_eq!(s.stroke.color, "#54585a");
        assert!(s.stroke.is_dashed());
    }

    #[test]
    fn service_rule_uses_feature_color() {
        let f = feature(LayerKind::Services, json!({ "COLOR": "#beaed4" }));
        let s = rule_for(LayerKind::Services)(&f);
        assert_eq!(s.fill_color, "#beaed4");
        assert!(!s.stroke.is_dashed());
    }

    #[test]
    fn county_rule_is_translucent_and_dashed() {
        let s = county_style(&feature(LayerKind::Counties, json!({})));
        assert_eq!(s.fill_opacity, 0.1);
        assert_eq!(s.stroke.dash_array.as_deref(), Some("3"));
    }

    #[test]
    fn highlight_is_heavy_and_solid() {
        let h = highlight_stroke();
        assert_eq!(h.weight, 5.0);
        assert!(!h.is_dashed());
    }

    #[test]
    fn resting_stroke_restores_rule() {
        let state = feature(LayerKind::States, json!({}));
        assert_eq!(resting_stroke(&state), state_style(&state).stroke);

        let svc = feature(LayerKind::Services, json!({ "COLOR": "red" }));
        let rest = resting_stroke(&svc);
        assert_eq!(rest.weight, 2.0);
        assert!(!rest.is_dashed());
    }

    #[test]
    fn apply_stroke_round_trip_is_exact() {
        for kind in [LayerKind::States, LayerKind::Services, LayerKind::Counties] {
            let f = feature(kind, json!({ "COLOR": "#000" }));
            let original = rule_for(kind)(&f);
            let mut current = original.clone();
            current.apply_stroke(&highlight_stroke());
            assert_eq!(current.stroke.weight, 5.0);
            assert_eq!(current.stroke.dash_array, None);
            current.apply_stroke(&resting_stroke(&f));
            assert_eq!(current, original, "{kind}");
        }
    }

    #[test]
    fn serializes_leaflet_path_options() {
        let f = feature(LayerKind::Counties, json!({}));
        let v = serde_json::to_value(county_style(&f)).unwrap();
        assert_eq!(
            v,
            json!({
                "fillColor": "white",
                "fillOpacity": 0.1,
                "weight": 2.0,
                "color": "#54585a",
                "dashArray": "3"
            })
        );
    }
}
