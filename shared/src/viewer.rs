use serde_json::Value;

use crate::bounds::{YearBounds, compute_bounds};
use crate::catalog::PlaceCatalog;
use crate::config::ViewerConfig;
use crate::error::{FetchError, VisitError};
use crate::gate::EditGate;
use crate::persistence::VisitPersistence;
use crate::playback::{PlaybackDriver, PlaybackState, Scheduler, TickOutcome};
use crate::projection::{HighlightStyle, PlaceFill, current_label, project};
use crate::store::RecordStore;
use crate::visit::{self, VisitRecord};

/// Everything the renderer needs after one recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFrame {
    pub year: i32,
    pub bounds: YearBounds,
    pub fills: Vec<PlaceFill>,
    /// Names of the places visited in `year`; `None` hides the overlay.
    pub label: Option<String>,
    pub playing: bool,
}

impl MapFrame {
    /// Frame shown before any data has loaded.
    pub fn blank(bounds: YearBounds) -> Self {
        Self {
            year: bounds.min,
            bounds,
            fills: Vec::new(),
            label: None,
            playing: false,
        }
    }
}

impl Default for MapFrame {
    fn default() -> Self {
        Self::blank(ViewerConfig::default().default_bounds())
    }
}

/// One row of the editable visit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRow {
    pub index: usize,
    pub year: i32,
    pub place: String,
    pub name: String,
}

/// Application state: the record store plus everything derived from it.
/// All mutations go through these methods, so a single owner serializes them.
pub struct Viewer<P, S: Scheduler> {
    config: ViewerConfig,
    store: RecordStore<P>,
    catalog: PlaceCatalog,
    bounds: YearBounds,
    year: i32,
    gate: EditGate,
    playback: PlaybackDriver<S::Handle>,
    scheduler: S,
    sample: fn() -> f64,
}

impl<P: VisitPersistence, S: Scheduler> Viewer<P, S> {
    /// `sample` supplies uniform values in `[0, 1)` for playback flashes.
    pub fn new(config: ViewerConfig, persistence: P, scheduler: S, sample: fn() -> f64) -> Self {
        let bounds = config.default_bounds();
        Self {
            store: RecordStore::new(persistence, config.storage_key.clone()),
            catalog: PlaceCatalog::default(),
            bounds,
            year: bounds.min,
            gate: EditGate::new(config.edit_key.clone()),
            playback: PlaybackDriver::new(config.play_delay()),
            scheduler,
            sample,
            config,
        }
    }

    /// Load saved visits and rewind to the start of the timeline. Returns
    /// `true` when nothing was saved and defaults should be fetched.
    pub fn initialize(&mut self) -> bool {
        let loaded = self.store.load();
        self.refresh_bounds();
        self.year = self.bounds.min;
        tracing::info!(
            loaded,
            min = self.bounds.min,
            max = self.bounds.max,
            "viewer initialized"
        );
        loaded == 0
    }

    /// Seed an empty store from the default data set. Fetch failures are
    /// logged and leave the store empty.
    pub fn bootstrap(&mut self, payload: Result<Value, FetchError>) -> MapFrame {
        match payload.and_then(|value| visit::decode_bootstrap(&value)) {
            Ok(defaults) => {
                self.store.bootstrap(defaults);
                self.refresh_bounds();
            }
            Err(e) => {
                tracing::warn!(error = %e, "default visits unavailable; starting empty");
            }
        }
        self.frame()
    }

    pub fn set_catalog(&mut self, catalog: PlaceCatalog) -> MapFrame {
        tracing::debug!(places = catalog.len(), "place catalog ready");
        self.catalog = catalog;
        self.frame()
    }

    /// Slider input. Clamped into the current bounds; playback keeps running.
    pub fn set_year(&mut self, year: i32) -> MapFrame {
        self.year = self.bounds.clamp(year);
        self.frame()
    }

    /// Play/pause toggle.
    pub fn toggle_playback(&mut self) -> MapFrame {
        if !self.playback.stop() {
            self.playback
                .start(&mut self.scheduler, self.bounds, &mut self.year);
        }
        self.frame()
    }

    /// Timer callback. `None` when a stale tick arrives after stopping.
    pub fn tick(&mut self) -> Option<MapFrame> {
        match self.playback.tick(self.bounds, &mut self.year) {
            TickOutcome::Advanced(_) => Some(self.frame()),
            TickOutcome::Finished => {
                tracing::debug!(year = self.year, "playback reached the end of the timeline");
                Some(self.frame())
            }
            TickOutcome::Idle => None,
        }
    }

    pub fn reset(&mut self) -> MapFrame {
        self.playback.reset(self.bounds, &mut self.year);
        self.frame()
    }

    pub fn enable_editing(&mut self, secret: &str) -> bool {
        self.gate.request_enable(secret)
    }

    pub fn disable_editing(&mut self) {
        self.gate.disable();
    }

    /// Mark a row for editing and return it for the form.
    pub fn begin_edit(&mut self, index: usize) -> Result<VisitRecord, VisitError> {
        self.gate.ensure_open()?;
        let record = self.store.get(index).cloned().ok_or(VisitError::Index {
            index,
            len: self.store.len(),
        })?;
        self.gate.begin_edit(index)?;
        Ok(record)
    }

    pub fn cancel_edit(&mut self) {
        self.gate.finish_edit();
    }

    /// Add a visit, or update the row being edited.
    pub fn submit(&mut self, year: Option<i32>, place: &str) -> Result<MapFrame, VisitError> {
        self.gate.ensure_open()?;
        let year = year.ok_or_else(|| VisitError::Validation("a year must be selected".into()))?;
        visit::validate_place(place)?;

        match self.gate.editing() {
            Some(index) => {
                let result = self.store.update(index, year, place);
                if let Err(e @ VisitError::Index { .. }) = &result {
                    tracing::warn!(error = %e, "edit target went stale");
                    self.gate.finish_edit();
                }
                result?;
                self.gate.finish_edit();
            }
            None => self.store.add(year, place)?,
        }
        self.refresh_bounds();
        Ok(self.frame())
    }

    pub fn delete(&mut self, index: usize) -> Result<MapFrame, VisitError> {
        self.gate.ensure_open()?;
        if let Err(e) = self.store.delete(index) {
            tracing::warn!(error = %e, "ignoring delete of stale row");
            return Err(e);
        }
        self.gate.row_removed(index);
        self.refresh_bounds();
        Ok(self.frame())
    }

    /// Recompute the projection for the selected year.
    pub fn frame(&self) -> MapFrame {
        let records = self.store.records();
        let projection = project(records, self.year);
        let style = if self.playback.is_playing() {
            HighlightStyle::Flash
        } else {
            HighlightStyle::Steady
        };
        MapFrame {
            year: self.year,
            bounds: self.bounds,
            fills: projection.fills(self.catalog.ids(), style, self.sample),
            label: current_label(records, self.year, &self.catalog),
            playing: self.playback.is_playing(),
        }
    }

    pub fn rows(&self) -> Vec<VisitRow> {
        self.store
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| VisitRow {
                index,
                year: record.year,
                place: record.place.clone(),
                name: self.catalog.display_name(&record.place).to_string(),
            })
            .collect()
    }

    /// Years offered by the year selector: the configured range plus any
    /// recorded year outside it, ascending.
    pub fn year_options(&self) -> Vec<i32> {
        let mut years: Vec<i32> =
            (self.config.selector_min_year..=self.config.selector_max_year).collect();
        years.extend(self.store.records().iter().map(|record| record.year));
        years.sort_unstable();
        years.dedup();
        years
    }

    fn refresh_bounds(&mut self) {
        self.bounds = compute_bounds(
            self.store.records(),
            self.config.default_min_year,
            self.config.default_max_year,
        );
        self.year = self.bounds.clamp(self.year);
    }

    pub fn records(&self) -> &[VisitRecord] {
        self.store.records()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn bounds(&self) -> YearBounds {
        self.bounds
    }

    pub fn is_editing(&self) -> bool {
        self.gate.is_open()
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.gate.editing()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn persistence(&self) -> &P {
        self.store.persistence()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::persistence::MemoryPersistence;
    use crate::playback::testing::ManualScheduler;
    use crate::projection::Fill;

    type TestViewer = Viewer<MemoryPersistence, ManualScheduler>;

    const KEY: &str = "visits";

    fn half() -> f64 {
        0.5
    }

    fn viewer_with(persistence: MemoryPersistence) -> (TestViewer, ManualScheduler) {
        let scheduler = ManualScheduler::default();
        let mut viewer = Viewer::new(
            ViewerConfig::default(),
            persistence,
            scheduler.clone(),
            half,
        );
        viewer.set_catalog(PlaceCatalog::from_entries([
            ("DE", "Germany"),
            ("FR", "France"),
            ("JP", "Japan"),
        ]));
        (viewer, scheduler)
    }

    fn seeded() -> (TestViewer, ManualScheduler) {
        let persistence = MemoryPersistence::new().with_raw(
            KEY,
            r#"[{"year":1999,"country":"FR"},{"year":2005,"country":"JP"}]"#,
        );
        let (mut viewer, scheduler) = viewer_with(persistence);
        assert!(!viewer.initialize());
        (viewer, scheduler)
    }

    fn fill_of(frame: &MapFrame, place: &str) -> Fill {
        frame
            .fills
            .iter()
            .find(|f| f.place == place)
            .map(|f| f.fill)
            .unwrap()
    }

    #[test]
    fn initialize_derives_bounds_and_rewinds() {
        let (viewer, _) = seeded();
        assert_eq!(viewer.bounds(), YearBounds::new(1998, 2006));
        assert_eq!(viewer.year(), 1998);
    }

    #[test]
    fn empty_storage_requests_bootstrap() {
        let (mut viewer, _) = viewer_with(MemoryPersistence::new());
        assert!(viewer.initialize());
        assert_eq!(viewer.bounds(), YearBounds::new(1980, 2030));
        assert_eq!(viewer.year(), 1980);

        let frame = viewer.bootstrap(Ok(json!([
            { "year": "1999", "country": "FR" },
            { "year": 2005, "country": "JP" },
            { "year": "n/a", "country": "DE" },
        ])));
        assert_eq!(viewer.records().len(), 2);
        assert_eq!(frame.bounds, YearBounds::new(1998, 2006));
        assert_eq!(frame.year, 1998);
        assert!(viewer.persistence().raw(KEY).is_some());
    }

    #[test]
    fn bootstrap_failure_keeps_empty_defaults() {
        let (mut viewer, _) = viewer_with(MemoryPersistence::new());
        viewer.initialize();
        let frame = viewer.bootstrap(Err(FetchError::Status(404)));
        assert!(viewer.records().is_empty());
        assert_eq!(frame.bounds, YearBounds::new(1980, 2030));

        viewer.bootstrap(Ok(json!({ "oops": true })));
        assert!(viewer.records().is_empty());
    }

    #[test]
    fn frame_colours_past_and_current() {
        let (mut viewer, _) = seeded();
        let frame = viewer.set_year(2005);
        assert_eq!(fill_of(&frame, "FR"), Fill::Visited);
        assert_eq!(fill_of(&frame, "JP"), Fill::Highlight);
        assert_eq!(fill_of(&frame, "DE"), Fill::Default);
        assert_eq!(frame.label.as_deref(), Some("Japan"));
        assert!(!frame.playing);
    }

    #[test]
    fn slider_input_is_clamped() {
        let (mut viewer, _) = seeded();
        assert_eq!(viewer.set_year(1900).year, 1998);
        assert_eq!(viewer.set_year(2100).year, 2006);
    }

    #[test]
    fn mutations_require_open_gate() {
        let (mut viewer, _) = seeded();
        assert_eq!(
            viewer.submit(Some(2001), "DE"),
            Err(VisitError::EditLocked)
        );
        assert_eq!(viewer.delete(0), Err(VisitError::EditLocked));
        assert_eq!(viewer.begin_edit(0), Err(VisitError::EditLocked));

        assert!(!viewer.enable_editing("wrong"));
        assert!(!viewer.is_editing());
        assert_eq!(viewer.records().len(), 2);
    }

    #[test]
    fn add_rejects_invalid_input() {
        let (mut viewer, _) = seeded();
        assert!(viewer.enable_editing("change_me"));
        assert!(matches!(
            viewer.submit(Some(2001), ""),
            Err(VisitError::Validation(_))
        ));
        assert!(matches!(
            viewer.submit(None, "DE"),
            Err(VisitError::Validation(_))
        ));
        assert_eq!(viewer.records().len(), 2);
    }

    #[test]
    fn add_widens_bounds_and_keeps_year_in_range() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.set_year(2006);
        let frame = viewer.submit(Some(2010), "DE").unwrap();
        assert_eq!(frame.bounds, YearBounds::new(1998, 2011));
        assert_eq!(frame.year, 2006);
        assert_eq!(viewer.records().len(), 3);
    }

    #[test]
    fn delete_narrows_bounds_and_clamps_year() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.set_year(2006);
        let frame = viewer.delete(1).unwrap();
        assert_eq!(frame.bounds, YearBounds::new(1998, 2000));
        assert_eq!(frame.year, 2000);

        let frame = viewer.delete(0).unwrap();
        assert_eq!(frame.bounds, YearBounds::new(1980, 2030));
        assert_eq!(frame.year, 2000);
        assert!(viewer.persistence().raw(KEY).is_some());
    }

    #[test]
    fn stale_delete_is_a_no_op() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        assert_eq!(
            viewer.delete(7),
            Err(VisitError::Index { index: 7, len: 2 })
        );
        assert_eq!(viewer.records().len(), 2);
    }

    #[test]
    fn edit_flow_updates_target_row() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        assert_eq!(viewer.begin_edit(1), Ok(VisitRecord::new(2005, "JP")));
        assert_eq!(viewer.editing_index(), Some(1));

        viewer.submit(Some(2007), "DE").unwrap();
        assert_eq!(viewer.editing_index(), None);
        assert_eq!(
            viewer.records(),
            &[VisitRecord::new(1999, "FR"), VisitRecord::new(2007, "DE")]
        );
        assert_eq!(viewer.bounds(), YearBounds::new(1998, 2008));
    }

    #[test]
    fn cancelled_edit_adds_instead() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.begin_edit(0).unwrap();
        viewer.cancel_edit();
        assert!(viewer.is_editing());
        assert_eq!(viewer.editing_index(), None);

        viewer.submit(Some(2003), "DE").unwrap();
        assert_eq!(viewer.records().len(), 3);
        assert_eq!(viewer.records()[0], VisitRecord::new(1999, "FR"));
    }

    #[test]
    fn begin_edit_rejects_stale_row() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        assert_eq!(
            viewer.begin_edit(2),
            Err(VisitError::Index { index: 2, len: 2 })
        );
        assert_eq!(viewer.editing_index(), None);
    }

    #[test]
    fn deleting_earlier_row_keeps_edit_target() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.begin_edit(1).unwrap();
        viewer.delete(0).unwrap();
        assert_eq!(viewer.editing_index(), Some(0));
        viewer.submit(Some(2006), "JP").unwrap();
        assert_eq!(viewer.records(), &[VisitRecord::new(2006, "JP")]);
    }

    #[test]
    fn disabling_edit_mode_drops_target_and_falls_back_to_add() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.begin_edit(0).unwrap();
        viewer.disable_editing();
        assert_eq!(viewer.editing_index(), None);

        viewer.enable_editing("change_me");
        viewer.submit(Some(2001), "DE").unwrap();
        assert_eq!(viewer.records().len(), 3);
    }

    #[test]
    fn playback_runs_to_upper_bound_and_stops() {
        let (mut viewer, scheduler) = seeded();
        viewer.set_year(2003);

        let frame = viewer.toggle_playback();
        assert!(frame.playing);
        assert_eq!(frame.year, 1998);
        assert_eq!(scheduler.live(), 1);

        let mut years = Vec::new();
        while let Some(frame) = viewer.tick() {
            years.push(frame.year);
            if !frame.playing {
                break;
            }
        }
        assert_eq!(years, (1999..=2006).chain([2006]).collect::<Vec<_>>());
        assert_eq!(viewer.playback_state(), PlaybackState::Stopped);
        assert_eq!(scheduler.live(), 0);
        assert_eq!(viewer.tick(), None);
    }

    #[test]
    fn playback_flashes_current_places() {
        let (mut viewer, _) = seeded();
        viewer.toggle_playback();
        let mut frame = None;
        for _ in 0..7 {
            frame = viewer.tick();
        }
        let frame = frame.unwrap();
        assert_eq!(frame.year, 2005);
        assert!(matches!(fill_of(&frame, "JP"), Fill::Flash(_)));
        assert_eq!(fill_of(&frame, "FR"), Fill::Visited);
    }

    #[test]
    fn toggle_pauses_and_reset_rewinds() {
        let (mut viewer, scheduler) = seeded();
        viewer.toggle_playback();
        viewer.tick();
        viewer.tick();
        let paused = viewer.toggle_playback();
        assert!(!paused.playing);
        assert_eq!(paused.year, 2000);
        assert_eq!(viewer.tick(), None);

        viewer.toggle_playback();
        viewer.tick();
        let frame = viewer.reset();
        assert!(!frame.playing);
        assert_eq!(frame.year, 1998);
        assert_eq!(scheduler.started.get(), 2);
        assert_eq!(scheduler.live(), 0);
    }

    #[test]
    fn leaving_edit_mode_does_not_stop_playback() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.toggle_playback();
        viewer.disable_editing();
        assert_eq!(viewer.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn rows_use_display_names() {
        let (viewer, _) = seeded();
        let rows = viewer.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "France");
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn year_options_cover_recorded_years() {
        let (mut viewer, _) = seeded();
        viewer.enable_editing("change_me");
        viewer.submit(Some(1975), "DE").unwrap();
        let options = viewer.year_options();
        assert_eq!(options.first(), Some(&1975));
        assert_eq!(options.last(), Some(&2030));
        assert_eq!(options.len(), 52);
    }
}
