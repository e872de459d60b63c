#![cfg(feature = "sample-data")]

use choropleth_core::engine::EngineCall;
use choropleth_core::prelude::*;
use std::sync::Arc;

fn mounted() -> (HeadlessEngine, MapSession) {
    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());
    session.mount(&mut engine, "map").unwrap();
    session
        .load_datasets(&mut engine, Arc::new(Datasets::sample().unwrap()))
        .unwrap();
    (engine, session)
}

fn click_state(engine: &mut HeadlessEngine, session: &mut MapSession, name: &str) {
    let target = engine.find_feature(LayerKind::States, name).unwrap();
    let click = engine.pointer(PointerEventKind::Click, target).unwrap();
    session.handle_event(engine, click).unwrap();
}

fn rendered_county_states(engine: &HeadlessEngine) -> Vec<String> {
    engine
        .layers_of_kind(LayerKind::Counties)
        .iter()
        .flat_map(|l| l.features.iter().map(|f| f.state_name.clone()))
        .collect()
}

#[test]
fn mount_with_datasets_attaches_base_layers_only() {
    let (engine, session) = mounted();
    let ctl = session.controller();

    assert!(ctl.states_layer().is_some());
    assert!(ctl.services_layer().is_some());
    assert!(ctl.county_layer().is_none());

    assert_eq!(engine.tile_layer_count(), 1);
    assert_eq!(engine.layers_of_kind(LayerKind::States).len(), 1);
    assert_eq!(engine.layers_of_kind(LayerKind::Services).len(), 1);
    assert!(engine.layers_of_kind(LayerKind::Counties).is_empty());
    assert_eq!(session.view_state(), &ViewState::Overview);
}

#[test]
fn base_layers_stack_tiles_states_services() {
    let (engine, _) = mounted();
    let order: Vec<_> = engine
        .calls()
        .iter()
        .filter_map(|c| match c {
            EngineCall::AddTileLayer { .. } => Some("tiles"),
            EngineCall::AddPolygonLayer { kind, .. } => Some(kind.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(order, ["tiles", "states", "services"]);
}

#[test]
fn datasets_before_mount_attach_on_mount() {
    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());
    session
        .load_datasets(&mut engine, Arc::new(Datasets::sample().unwrap()))
        .unwrap();
    assert!(engine.calls().is_empty());
    assert!(session.controller().states_layer().is_none());

    session.mount(&mut engine, "map").unwrap();
    assert!(session.controller().states_layer().is_some());
    assert!(session.controller().services_layer().is_some());
}

#[test]
fn clicking_colorado_fits_bounds_and_loads_its_counties() {
    let (mut engine, mut session) = mounted();
    click_state(&mut engine, &mut session, "Colorado");

    let colorado = session
        .controller()
        .datasets()
        .unwrap()
        .find_state("Colorado")
        .unwrap()
        .1
        .bounds()
        .unwrap();
    assert_eq!(engine.viewport().unwrap().fitted, Some(colorado));

    let states = rendered_county_states(&engine);
    assert!(!states.is_empty());
    assert!(states.iter().all(|s| s == "Colorado"));

    let ds = session.controller().datasets().unwrap();
    let layer = session.controller().county_layer().unwrap();
    assert_eq!(layer.members(), ds.county_indices_for_state("Colorado").as_slice());
    assert_eq!(
        session.view_state(),
        &ViewState::StateActivated {
            state_name: "Colorado".into()
        }
    );
}

#[test]
fn county_layer_membership_matches_predicate_exactly() {
    let (mut engine, mut session) = mounted();
    for state in ["Colorado", "Utah", "Wyoming"] {
        click_state(&mut engine, &mut session, state);
        let ds = session.controller().datasets().unwrap();
        let members = session.controller().county_layer().unwrap().members();
        for (i, county) in ds.counties.features.iter().enumerate() {
            let (parent, _) = county.selection_names();
            assert_eq!(members.contains(&i), parent == state, "county #{i} for {state}");
        }
    }
}

#[test]
fn switching_state_replaces_county_layer() {
    let (mut engine, mut session) = mounted();
    click_state(&mut engine, &mut session, "Colorado");
    let first = session.controller().county_layer().unwrap().handle();
    engine.take_calls();

    click_state(&mut engine, &mut session, "Utah");

    let calls = engine.calls();
    let cleared = calls
        .iter()
        .position(|c| *c == EngineCall::ClearLayer { layer: first })
        .expect("previous county layer cleared");
    let added = calls
        .iter()
        .position(|c| matches!(c, EngineCall::AddPolygonLayer { kind: LayerKind::Counties, .. }))
        .unwrap();
    assert!(cleared < added);

    assert_eq!(engine.layers_of_kind(LayerKind::Counties).len(), 1);
    let states = rendered_county_states(&engine);
    assert!(!states.is_empty());
    assert!(states.iter().all(|s| s == "Utah"));
}

#[test]
fn repeated_clicks_never_stack_county_layers() {
    let (mut engine, mut session) = mounted();
    for state in ["Utah", "Utah", "Wyoming", "Colorado", "Utah"] {
        click_state(&mut engine, &mut session, state);
        assert_eq!(engine.layers_of_kind(LayerKind::Counties).len(), 1);
    }
}

#[test]
fn reset_returns_to_overview() {
    let (mut engine, mut session) = mounted();
    let states = session.controller().states_layer().unwrap().clone();
    let services = session.controller().services_layer().unwrap().clone();
    click_state(&mut engine, &mut session, "Colorado");

    assert!(session.reset_view(&mut engine));

    let vp = engine.viewport().unwrap();
    assert_eq!(vp.center, LatLng::new(37.8, -96.0));
    assert_eq!(vp.zoom, 4);
    assert!(session.controller().county_layer().is_none());
    assert!(engine.layers_of_kind(LayerKind::Counties).is_empty());
    assert_eq!(session.controller().states_layer(), Some(&states));
    assert_eq!(session.controller().services_layer(), Some(&services));
    assert!(engine.layer(states.handle()).is_some());
    assert!(engine.layer(services.handle()).is_some());
    assert_eq!(session.view_state(), &ViewState::Overview);
}

#[test]
fn reset_without_county_layer_still_recenters() {
    let (mut engine, mut session) = mounted();
    let map = session.controller().map().unwrap();
    engine.set_view(map, LatLng::new(10.0, 10.0), 9);
    engine.take_calls();

    assert!(session.reset_view(&mut engine));
    let vp = engine.viewport().unwrap();
    assert_eq!(vp.center, LatLng::new(37.8, -96.0));
    assert_eq!(vp.zoom, 4);
    assert!(!engine
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCall::ClearLayer { .. })));
    assert_eq!(session.view_state(), &ViewState::Overview);

    // After a drill-down and one reset, a later pan is still undone.
    click_state(&mut engine, &mut session, "Wyoming");
    assert!(session.reset_view(&mut engine));
    engine.set_view(map, LatLng::new(41.0, -105.0), 7);
    engine.take_calls();
    assert!(session.reset_view(&mut engine));
    assert_eq!(engine.viewport().unwrap().center, LatLng::new(37.8, -96.0));
    assert!(!engine
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCall::ClearLayer { .. })));
}

#[test]
fn reset_before_mount_does_nothing() {
    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());
    assert!(!session.reset_view(&mut engine));
    assert!(engine.calls().is_empty());
}

#[test]
fn state_without_counties_gets_an_empty_layer() {
    let states = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "name": "Nevada" },
          "geometry": { "type": "Polygon", "coordinates": [[[-120, 35], [-114, 35], [-114, 42], [-120, 35]]] } }
    ] }"#;
    let empty = r#"{ "type": "FeatureCollection", "features": [] }"#;
    let mut engine = HeadlessEngine::new();
    let mut session = MapSession::new(MapConfig::default());
    session.mount(&mut engine, "map").unwrap();
    session
        .load_datasets(
            &mut engine,
            Arc::new(Datasets::from_json_strs(states, empty, empty).unwrap()),
        )
        .unwrap();

    click_state(&mut engine, &mut session, "Nevada");
    let layer = session.controller().county_layer().unwrap();
    assert!(layer.is_empty());
    assert_eq!(engine.layers_of_kind(LayerKind::Counties).len(), 1);
    assert!(session.reset_view(&mut engine));
}

#[test]
fn unmount_destroys_map_and_allows_remount() {
    let (mut engine, mut session) = mounted();
    click_state(&mut engine, &mut session, "Utah");
    session.unmount(&mut engine);

    assert!(engine.viewport().is_none());
    assert_eq!(engine.layers().count(), 0);
    assert!(session.controller().map().is_none());
    assert!(session.controller().county_layer().is_none());
    assert_eq!(session.view_state(), &ViewState::Overview);

    // Unmounting twice is harmless.
    session.unmount(&mut engine);

    session.mount(&mut engine, "map").unwrap();
    assert!(session.controller().states_layer().is_some());
    assert!(session.controller().county_layer().is_none());
}
