use choropleth_core::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;

const STATES: usize = 50;
const COUNTIES_PER_STATE: usize = 62;

fn square(x: f64, y: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y]]]
    })
}

/// Roughly the shape of the real U.S. data: 50 states, ~3100 counties.
fn synthetic() -> Datasets {
    let mut states = Vec::new();
    let mut counties = Vec::new();
    for s in 0..STATES {
        let (sx, sy) = (-125.0 + (s % 10) as f64 * 6.0, 25.0 + (s / 10) as f64 * 5.0);
        let name = format!("State {s}");
        states.push(json!({ "type": "Feature", "properties": { "name": name }, "geometry": square(sx, sy, 5.0) }));
        for c in 0..COUNTIES_PER_STATE {
            let (cx, cy) = (sx + (c % 8) as f64 * 0.6, sy + (c / 8) as f64 * 0.6);
            counties.push(json!({
                "type": "Feature",
                "properties": { "NAME": format!("County {s}-{c}"), "STATE": name },
                "geometry": square(cx, cy, 0.5)
            }));
        }
    }
    let fc = |features: Vec<Value>| json!({ "type": "FeatureCollection", "features": features });
    Datasets::from_values(fc(states), fc(counties), fc(Vec::new())).unwrap()
}

fn bench_county_filter(c: &mut Criterion) {
    let ds = synthetic();
    c.bench_function("county_indices_for_state", |b| {
        b.iter(|| ds.county_indices_for_state(black_box("State 37")))
    });
}

fn bench_drill_down(c: &mut Criterion) {
    let ds = Arc::new(synthetic());
    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());
    session.mount(&mut engine, "map").unwrap();
    session.load_datasets(&mut engine, ds).unwrap();
    let targets: Vec<_> = ["State 3", "State 21", "State 44"]
        .iter()
        .map(|name| engine.find_feature(LayerKind::States, name).unwrap())
        .collect();

    c.bench_function("zoom_to_state", |b| {
        let mut i = 0;
        b.iter(|| {
            let event = PointerEvent::new(PointerEventKind::Click, targets[i % targets.len()]);
            session.handle_event(&mut engine, event).unwrap();
            engine.take_calls();
            i += 1;
        })
    });
}

criterion_group!(benches, bench_county_filter, bench_drill_down);
criterion_main!(benches);
