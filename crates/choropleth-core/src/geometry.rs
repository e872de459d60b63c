// crates/choropleth-core/src/geometry.rs
use serde::{Deserialize, Serialize};

/// A GeoJSON position: `[lng, lat]` with an optional trailing altitude
/// that the map ignores.
pub type Position = Vec<f64>;

/// A latitude/longitude pair, serialized as `[lat, lng]` (Leaflet order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

/// Axis-aligned geographic bounds, serialized as `[[south, west], [north, east]]`
/// which is what `fitBounds` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLng; 2]", into = "[LatLng; 2]")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    fn from_point(p: LatLng) -> Self {
        Self {
            south_west: p,
            north_east: p,
        }
    }

    fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }
}

impl From<[LatLng; 2]> for Bounds {
    fn from([south_west, north_east]: [LatLng; 2]) -> Self {
        Self {
            south_west,
            north_east,
        }
    }
}

impl From<Bounds> for [LatLng; 2] {
    fn from(b: Bounds) -> Self {
        [b.south_west, b.north_east]
    }
}

/// Polygonal geometry of a feature. Serializes back to the GeoJSON
/// `{ "type": ..., "coordinates": ... }` shape so it can be handed to the
/// engine unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten()),
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
        }
    }

    /// Bounds of every vertex, or `None` for a geometry without any usable
    /// position.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut out: Option<Bounds> = None;
        for pos in self.positions() {
            let (Some(&lng), Some(&lat)) = (pos.first(), pos.get(1)) else {
                continue;
            };
            let p = LatLng::new(lat, lng);
            if !p.is_finite() {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.extend(p),
                None => out = Some(Bounds::from_point(p)),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f64, s: f64, e: f64, n: f64) -> Vec<Vec<Position>> {
        vec![vec![
            vec![w, s],
            vec![e, s],
            vec![e, n],
            vec![w, n],
            vec![w, s],
        ]]
    }

    #[test]
    fn polygon_bounds_swap_to_lat_lng() {
        let g = Geometry::Polygon(rect(-109.05, 36.99, -102.04, 41.0));
        let b = g.bounds().unwrap();
        assert_eq!(b.south_west, LatLng::new(36.99, -109.05));
        assert_eq!(b.north_east, LatLng::new(41.0, -102.04));
        assert!(b.contains(b.center()));
    }

    #[test]
    fn multipolygon_bounds_cover_all_parts() {
        let g = Geometry::MultiPolygon(vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, -2.0, 6.0, 3.0)]);
        let b = g.bounds().unwrap();
        assert_eq!(b.south_west, LatLng::new(-2.0, 0.0));
        assert_eq!(b.north_east, LatLng::new(3.0, 6.0));
    }

    #[test]
    fn empty_or_short_positions_have_no_bounds() {
        assert!(Geometry::Polygon(vec![]).bounds().is_none());
        assert!(Geometry::Polygon(vec![vec![vec![1.0]]]).bounds().is_none());
    }

    #[test]
    fn geometry_round_trips_geojson_shape() {
        let json = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0, 12.5], [0.0, 0.0]]]
        });
        let g: Geometry = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&g).unwrap(), json);
    }

    #[test]
    fn bounds_serialize_for_fit_bounds() {
        let b = Bounds::from([LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)]);
        assert_eq!(
            serde_json::to_value(b).unwrap(),
            serde_json::json!([[1.0, 2.0], [3.0, 4.0]])
        );
    }
}
