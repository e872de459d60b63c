//! Headless walkthrough for choropleth-rs
//!
//! Drives a full map session against the recording engine and prints what a
//! browser would have drawn:
//! - mount the map and load the bundled sample datasets
//! - hover a state, click it, hover one of its counties
//! - switch to another state, then reset to the overview
//!
//! Run with `RUST_LOG=debug` to see the controller's own trace.

use choropleth_rs::engine::EngineCall;
use choropleth_rs::prelude::*;
use std::sync::Arc;

fn pointer(
    engine: &mut HeadlessEngine,
    session: &mut MapSession,
    kind: PointerEventKind,
    layer: LayerKind,
    name: &str,
) -> Result<()> {
    let Some(target) = engine.find_feature(layer, name) else {
        println!("  (no {layer} feature named {name})");
        return Ok(());
    };
    let Some(event) = engine.pointer(kind, target) else {
        println!("  ({name} does not listen for {kind:?})");
        return Ok(());
    };
    if session.handle_event(engine, event)? {
        let sel = session.selection();
        println!("  display -> state: {:?}, county: {:?}", sel.state_name, sel.county_name);
    }
    Ok(())
}

fn print_calls(engine: &mut HeadlessEngine) {
    for call in engine.take_calls() {
        match call {
            EngineCall::Subscribe { .. } | EngineCall::BindPopup { .. } => {}
            other => println!("  engine: {other:?}"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== choropleth-rs headless walkthrough ===\n");

    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());

    println!("--- Mount + datasets ---");
    session.mount(&mut engine, "map")?;
    let datasets = Datasets::sample()?;
    let stats = datasets.stats();
    println!(
        "  {} states, {} counties, {} service areas",
        stats.states, stats.counties, stats.services
    );
    session.load_datasets(&mut engine, Arc::new(datasets))?;
    print_calls(&mut engine);

    println!("\n--- Hover + click Colorado ---");
    pointer(&mut engine, &mut session, PointerEventKind::PointerEnter, LayerKind::States, "Colorado")?;
    pointer(&mut engine, &mut session, PointerEventKind::Click, LayerKind::States, "Colorado")?;
    pointer(&mut engine, &mut session, PointerEventKind::PointerLeave, LayerKind::States, "Colorado")?;
    print_calls(&mut engine);
    println!("  view: {:?}", session.view_state());

    println!("\n--- Hover Boulder county ---");
    pointer(&mut engine, &mut session, PointerEventKind::PointerEnter, LayerKind::Counties, "Boulder")?;
    pointer(&mut engine, &mut session, PointerEventKind::PointerLeave, LayerKind::Counties, "Boulder")?;

    println!("\n--- Click Utah ---");
    pointer(&mut engine, &mut session, PointerEventKind::Click, LayerKind::States, "Utah")?;
    print_calls(&mut engine);
    for layer in engine.layers_of_kind(LayerKind::Counties) {
        for f in &layer.features {
            println!("  county layer: {} ({})", f.name, f.state_name);
        }
    }

    println!("\n--- Reset ---");
    println!("  reset applied: {}", session.reset_view(&mut engine));
    println!("  reset again:   {}", session.reset_view(&mut engine));
    print_calls(&mut engine);
    if let Some(vp) = engine.viewport() {
        println!("  viewport: center {:?}, zoom {}", vp.center, vp.zoom);
    }

    session.unmount(&mut engine);
    print_calls(&mut engine);

    println!("\n=== Walkthrough completed ===");
    Ok(())
}
