// crates/choropleth-core/src/selection.rs
use crate::feature::Feature;
use serde::{Deserialize, Serialize};

/// Names shown by the selection display.
///
/// Both fields are empty when nothing is highlighted. While a county or
/// service area is highlighted, `state_name` holds its parent state: its
/// `STATE` property as given. A record without `STATE` therefore yields an
/// empty `state_name` next to a non-empty `county_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "state")]
    pub state_name: String,
    #[serde(rename = "county")]
    pub county_name: String,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.state_name.is_empty() && self.county_name.is_empty()
    }

    /// Points the selection at `feature`. Returns whether anything changed.
    pub fn highlight(&mut self, feature: &Feature) -> bool {
        let (state, county) = feature.selection_names();
        self.set(state, county)
    }

    /// Returns whether anything changed.
    pub fn clear(&mut self) -> bool {
        self.set("", "")
    }

    fn set(&mut self, state: &str, county: &str) -> bool {
        if self.state_name == state && self.county_name == county {
            return false;
        }
        self.state_name.clear();
        self.state_name.push_str(state);
        self.county_name.clear();
        self.county_name.push_str(county);
        true
    }
}
