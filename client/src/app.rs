use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use wayfarer_shared::catalog::PlaceOption;
use wayfarer_shared::{MapFrame, Palette, Viewer, VisitRow};

use crate::editor::VisitEditor;
use crate::fetch;
use crate::map::{ShapePath, WorldMap, shape_paths};
use crate::storage::BrowserStorage;
use crate::timeline::Timeline;
use crate::timer::IntervalScheduler;

pub(crate) type ClientViewer = Viewer<BrowserStorage, IntervalScheduler>;

thread_local! {
    static VIEWER: RefCell<Option<ClientViewer>> = const { RefCell::new(None) };
}

/// Newtype wrappers so each signal gets a distinct context type.
#[derive(Clone, Copy)]
pub(crate) struct FrameSignal(pub RwSignal<MapFrame>);
#[derive(Clone, Copy)]
pub(crate) struct MapShapes(pub RwSignal<Vec<ShapePath>>);
#[derive(Clone, Copy)]
pub(crate) struct PaletteSetting(pub RwSignal<Palette>);
#[derive(Clone, Copy)]
pub(crate) struct Hovered(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct PlaceOptions(pub RwSignal<Vec<PlaceOption>>);
/// Form state of the visit editor: selected year and place, as option values.
#[derive(Clone, Copy)]
pub(crate) struct FormYear(pub RwSignal<String>);
#[derive(Clone, Copy)]
pub(crate) struct FormPlace(pub RwSignal<String>);

/// Signals mirrored from the viewer after every mutation.
#[derive(Clone, Copy)]
pub(crate) struct ViewState {
    pub frame: RwSignal<MapFrame>,
    pub rows: RwSignal<Vec<VisitRow>>,
    pub year_options: RwSignal<Vec<i32>>,
    pub editing: RwSignal<bool>,
    pub edit_target: RwSignal<Option<usize>>,
}

struct Snapshot {
    frame: MapFrame,
    rows: Vec<VisitRow>,
    year_options: Vec<i32>,
    editing: bool,
    edit_target: Option<usize>,
}

impl Snapshot {
    fn capture(viewer: &ClientViewer) -> Self {
        Self {
            frame: viewer.frame(),
            rows: viewer.rows(),
            year_options: viewer.year_options(),
            editing: viewer.is_editing(),
            edit_target: viewer.editing_index(),
        }
    }
}

impl ViewState {
    fn new() -> Self {
        Self {
            frame: RwSignal::new(MapFrame::default()),
            rows: RwSignal::new(Vec::new()),
            year_options: RwSignal::new(Vec::new()),
            editing: RwSignal::new(false),
            edit_target: RwSignal::new(None),
        }
    }

    fn apply(&self, snapshot: Snapshot) {
        self.frame.set(snapshot.frame);
        self.rows.set(snapshot.rows);
        self.year_options.set(snapshot.year_options);
        self.editing.set(snapshot.editing);
        self.edit_target.set(snapshot.edit_target);
    }

    /// Run `f` against the viewer, then publish the resulting state. Signals
    /// are written after the viewer borrow ends so subscribers may call back
    /// in. `None` until the viewer exists.
    pub fn dispatch<R>(&self, f: impl FnOnce(&mut ClientViewer) -> R) -> Option<R> {
        let (result, snapshot) = VIEWER.with(|slot| {
            let mut slot = slot.borrow_mut();
            let viewer = slot.as_mut()?;
            let result = f(viewer);
            Some((result, Snapshot::capture(viewer)))
        })?;
        self.apply(snapshot);
        Some(result)
    }
}

fn random_unit() -> f64 {
    js_sys::Math::random()
}

/// Build the viewer from config and saved visits, then pull geography and,
/// on first run, the default visits.
async fn boot(
    view: ViewState,
    shapes: RwSignal<Vec<ShapePath>>,
    places: RwSignal<Vec<PlaceOption>>,
    palette: RwSignal<Palette>,
) {
    let config = fetch::fetch_config().await;
    palette.set(config.palette.clone());
    let bootstrap_url = config.bootstrap_url.clone();
    let geography_url = config.geography_url.clone();

    let scheduler = IntervalScheduler::new(move || {
        view.dispatch(|viewer| viewer.tick());
    });
    let mut viewer = Viewer::new(config, BrowserStorage, scheduler, random_unit);
    let needs_defaults = viewer.initialize();
    VIEWER.with(|slot| *slot.borrow_mut() = Some(viewer));
    view.dispatch(|viewer| viewer.frame());

    spawn_local(async move {
        match fetch::fetch_geography(&geography_url).await {
            Ok(collection) => {
                let catalog = collection.catalog();
                if catalog.is_empty() {
                    tracing::warn!(url = %geography_url, "geography has no usable places");
                }
                places.set(catalog.options().to_vec());
                shapes.set(shape_paths(&collection.shapes()));
                view.dispatch(move |viewer| viewer.set_catalog(catalog));
            }
            Err(e) => {
                tracing::error!(error = %e, url = %geography_url, "failed to load geography");
            }
        }
    });

    if needs_defaults {
        let payload = fetch::fetch_bootstrap(&bootstrap_url).await;
        view.dispatch(move |viewer| viewer.bootstrap(payload));
    }
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let view_state = ViewState::new();
    let shapes: RwSignal<Vec<ShapePath>> = RwSignal::new(Vec::new());
    let palette: RwSignal<Palette> = RwSignal::new(Palette::default());
    let hovered: RwSignal<Option<String>> = RwSignal::new(None);
    let places: RwSignal<Vec<PlaceOption>> = RwSignal::new(Vec::new());
    let form_year: RwSignal<String> = RwSignal::new(String::new());
    let form_place: RwSignal<String> = RwSignal::new(String::new());

    provide_context(view_state);
    provide_context(FrameSignal(view_state.frame));
    provide_context(MapShapes(shapes));
    provide_context(PaletteSetting(palette));
    provide_context(Hovered(hovered));
    provide_context(PlaceOptions(places));
    provide_context(FormYear(form_year));
    provide_context(FormPlace(form_place));

    spawn_local(boot(view_state, shapes, places, palette));

    view! {
        <div class="layout">
            <header class="title">"Visited places"</header>
            <WorldMap />
            <Timeline />
            <VisitEditor />
        </div>
    }
}
