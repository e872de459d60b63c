// crates/choropleth-core/src/session.rs
use crate::config::MapConfig;
use crate::controller::LayerController;
use crate::dataset::Datasets;
use crate::engine::{MapEngine, MapHandle, PointerEvent, PointerEventKind};
use crate::error::Result;
use crate::interaction;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where the user is in the drill-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Overview,
    StateActivated { state_name: String },
}

/// One mounted map UI: the controller, the current selection and the
/// drill-down state. The host owns the engine and feeds events in.
///
/// ```rust
/// # #[cfg(feature = "sample-data")] {
/// use choropleth_core::prelude::*;
/// use std::sync::Arc;
///
/// let mut engine = HeadlessEngine::new();
/// let mut session = MapSession::new(MapConfig::default());
/// session.mount(&mut engine, "map").unwrap();
/// session.load_datasets(&mut engine, Arc::new(Datasets::sample().unwrap())).unwrap();
///
/// let utah = engine.find_feature(LayerKind::States, "Utah").unwrap();
/// let click = engine.pointer(PointerEventKind::Click, utah).unwrap();
/// session.handle_event(&mut engine, click).unwrap();
/// assert_eq!(session.view_state(), &ViewState::StateActivated { state_name: "Utah".into() });
///
/// assert!(session.reset_view(&mut engine));
/// assert_eq!(session.view_state(), &ViewState::Overview);
/// # }
/// ```
#[derive(Debug)]
pub struct MapSession {
    controller: LayerController,
    selection: Selection,
    view: ViewState,
}

impl MapSession {
    pub fn new(config: MapConfig) -> Self {
        Self {
            controller: LayerController::new(config),
            selection: Selection::default(),
            view: ViewState::Overview,
        }
    }

    pub fn controller(&self) -> &LayerController {
        &self.controller
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn mount<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        mount_target: &str,
    ) -> Result<MapHandle> {
        self.controller.initialize(engine, mount_target)
    }

    pub fn load_datasets<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        datasets: Arc<Datasets>,
    ) -> Result<()> {
        self.controller.load_datasets(engine, datasets)
    }

    /// Routes a pointer event. Returns whether the selection changed, so
    /// the host knows when to re-render the selection display.
    pub fn handle_event<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        event: PointerEvent,
    ) -> Result<bool> {
        match event.kind {
            PointerEventKind::Click => {
                if let Some(state_name) =
                    interaction::handle_zoom_to_state(&mut self.controller, engine, event.target)?
                {
                    self.view = ViewState::StateActivated { state_name };
                }
                Ok(false)
            }
            PointerEventKind::PointerEnter => Ok(interaction::handle_highlight(
                &self.controller,
                engine,
                &mut self.selection,
                event.target,
            )),
            PointerEventKind::PointerLeave => Ok(interaction::handle_unhighlight(
                &self.controller,
                engine,
                &mut self.selection,
                event.target,
            )),
        }
    }

    /// Reset control. Returns `false` only when nothing is mounted.
    pub fn reset_view<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> bool {
        let reset = self.controller.reset_view(engine);
        if reset {
            self.view = ViewState::Overview;
        }
        reset
    }

    pub fn unmount<E: MapEngine + ?Sized>(&mut self, engine: &mut E) {
        self.controller.teardown(engine);
        self.selection.clear();
        self.view = ViewState::Overview;
    }
}
