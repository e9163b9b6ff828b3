//=========================================================================
// Application Store
//=========================================================================
//
// Single owner of `AppState` and the only place it is mutated.
//
// Architecture:
//   Router / host ──Command──> Store::dispatch ──> setter | transition action
//                                                        │
//   Store::update() <── TimerQueue<StoreTask> <──────────┘ (delayed phases, cues)
//          │
//          └──> StoreEvent outbox ──drain_events()──> runtime / auto-save
//
// The store is single-threaded. Delayed work (transition phases, sequence
// cues) sits in one deadline-ordered timer queue and runs only when the
// owner calls `update()`, against the injected clock.
//
// Transition actions, sequence control and persistence actions are
// implemented on `Store` in their own modules (`transition`, `sequences`,
// `sync`).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::app_state::{AppState, Menu};
use super::catalog::{Galaxy, GalaxyCatalog};
use super::command::Command;
use super::events::StoreEvent;
use super::sequences::SequenceCue;
use super::transition::{ActiveTransition, TransitionId, TransitionPhase};
use crate::core::config::KpiaConfig;
use crate::core::persistence::ProfileStore;
use crate::core::scene::{Scene, ViewMode};
use crate::core::timing::{Clock, SequenceHandle, SystemClock, TimerQueue};

//=== StoreTask ===========================================================

/// Delayed work queued on the store's timer queue.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum StoreTask {
    Transition { id: TransitionId, phase: TransitionPhase },
    Cue(SequenceCue),
}

//=== Store ===============================================================

pub struct Store {
    pub(super) state: AppState,
    pub(super) config: KpiaConfig,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) timers: TimerQueue<StoreTask>,
    pub(super) transition: Option<ActiveTransition>,
    pub(super) next_transition: u64,
    pub(super) startup_sequence: Option<SequenceHandle>,
    pub(super) dive_sequence: Option<SequenceHandle>,
    pub(super) catalog: Arc<GalaxyCatalog>,
    pub(super) profiles: Option<Arc<dyn ProfileStore>>,
    pub(super) events: Vec<StoreEvent>,
}

impl Store {
    //--- Construction -----------------------------------------------------

    /// Store on the system clock with the built-in catalog and no
    /// profile backend. Panics on an invalid `config`.
    pub fn new(config: KpiaConfig) -> Self {
        StoreBuilder::new().with_config(config).build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    //--- Read Access ------------------------------------------------------

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &KpiaConfig {
        &self.config
    }

    pub fn catalog(&self) -> &GalaxyCatalog {
        &self.catalog
    }

    /// Current time on the store's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Catalog entry for the selected id.
    ///
    /// Unknown ids are legal selections; they simply match nothing.
    pub fn selected_galaxy(&self) -> Option<&Galaxy> {
        self.state.selection.selected.as_deref().and_then(|id| self.catalog.find(id))
    }

    pub fn hovered_galaxy(&self) -> Option<&Galaxy> {
        self.state.selection.hovered.as_deref().and_then(|id| self.catalog.find(id))
    }

    /// Deadline of the next delayed phase or cue.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    //--- Events -----------------------------------------------------------

    /// Takes every event published since the last drain.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    //--- update() ---------------------------------------------------------
    //
    // Runs every transition phase and sequence cue whose deadline has
    // passed, in deadline order. Work scheduled by a firing task that is
    // already due runs in the same call.
    //
    pub fn update(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while let Some((_, task)) = self.timers.pop_due(now) {
            match task {
                StoreTask::Transition { id, phase } => self.run_transition_phase(id, phase),
                StoreTask::Cue(cue) => self.apply_cue(cue),
            }
            fired += 1;
        }
        fired
    }

    //--- dispatch() -------------------------------------------------------
    //
    // Applies a routed command. Guarded actions may silently decline.
    //
    pub fn dispatch(&mut self, command: Command) {
        debug!("Dispatching {:?}", command);
        match command {
            Command::OpenMenu(menu) => self.set_menu(menu, true),
            Command::ToggleMenu(menu) => self.toggle_menu(menu),
            Command::CloseAllMenus => {
                self.close_all_menus();
            }
            Command::ToggleMute => self.toggle_mute(),
            Command::SetViewMode(mode) => self.set_view_mode(mode),
            Command::SelectGalaxy(id) => self.set_selected_galaxy(id.as_deref()),
            Command::ToggleSceneMode => {
                self.toggle_scene_mode();
            }
            Command::ReturnToStart => {
                self.return_to_start();
            }
            Command::WarpToGalaxy { id, name } => {
                self.warp_to_galaxy(&id, &name);
            }
            Command::EnterUniverse => {
                self.enter_universe();
            }
            Command::EnterSkillScene => {
                self.enter_skill_scene();
            }
            Command::SetStartupActive(active) => self.set_startup_active(active),
        }
    }

    //=== Atomic Setters ==================================================
    //
    // No validation beyond the type. Each publishes an event only when
    // the value actually changes.
    //

    //--- Scene & View -----------------------------------------------------

    /// Swaps the scene immediately. Leaving a scene clears the selection
    /// and the alternate presentation.
    pub fn set_scene(&mut self, scene: Scene) {
        let from = self.state.scene;
        if from == scene {
            return;
        }
        self.state.scene = scene;
        self.state.alternate_mode = false;
        self.set_hovered_galaxy(None);
        self.set_selected_galaxy(None);
        self.emit(StoreEvent::SceneChanged { from, to: scene });
        self.record_position();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.state.view_mode == mode {
            return;
        }
        self.state.view_mode = mode;
        self.emit(StoreEvent::ViewModeChanged(mode));
        self.record_position();
    }

    //--- Selection --------------------------------------------------------

    pub fn set_hovered_galaxy(&mut self, id: Option<&str>) {
        if self.state.selection.hovered.as_deref() == id {
            return;
        }
        self.state.selection.hovered = id.map(str::to_owned);
        self.emit(StoreEvent::HoverChanged(self.state.selection.hovered.clone()));
    }

    pub fn set_selected_galaxy(&mut self, id: Option<&str>) {
        if self.state.selection.selected.as_deref() == id {
            return;
        }
        self.state.selection.selected = id.map(str::to_owned);
        self.emit(StoreEvent::SelectionChanged(self.state.selection.selected.clone()));
        self.record_position();
    }

    //--- Menus ------------------------------------------------------------

    pub fn set_menu(&mut self, menu: Menu, open: bool) {
        if self.state.menus.set(menu, open) {
            self.emit(StoreEvent::MenuToggled { menu, open });
        }
    }

    pub fn toggle_menu(&mut self, menu: Menu) {
        let open = !self.state.menus.is_open(menu);
        self.set_menu(menu, open);
    }

    /// Closes every open menu. Returns how many were open.
    pub fn close_all_menus(&mut self) -> usize {
        let open = self.state.menus.open_menus();
        for &menu in &open {
            self.set_menu(menu, false);
        }
        open.len()
    }

    //--- Flags ------------------------------------------------------------

    pub fn set_muted(&mut self, muted: bool) {
        if self.state.muted != muted {
            self.state.muted = muted;
            self.emit(StoreEvent::MuteChanged(muted));
        }
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.state.muted);
    }

    pub fn set_alternate_mode(&mut self, alternate: bool) {
        self.state.alternate_mode = alternate;
    }

    pub fn set_diving(&mut self, diving: bool) {
        self.state.sequence.diving = diving;
    }

    pub fn set_awakening(&mut self, awakening: bool) {
        self.state.sequence.awakening = awakening;
    }

    //--- Progress ---------------------------------------------------------

    /// Nominally `[0, 1]`; stored as given. Non-finite values are ignored.
    pub fn set_erosion_level(&mut self, level: f64) {
        if !level.is_finite() {
            warn!("Ignoring non-finite erosion level {}", level);
            return;
        }
        if self.state.progress.erosion_level != level {
            self.state.progress.erosion_level = level;
            self.emit(StoreEvent::ProgressChanged);
        }
    }

    /// Non-finite values are ignored.
    pub fn set_kardashev_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            warn!("Ignoring non-finite Kardashev scale {}", scale);
            return;
        }
        if self.state.progress.kardashev_scale != scale {
            self.state.progress.kardashev_scale = scale;
            self.emit(StoreEvent::ProgressChanged);
        }
    }

    pub fn set_display_id(&mut self, display_id: Option<&str>) {
        if self.state.progress.display_id.as_deref() != display_id {
            self.state.progress.display_id = display_id.map(str::to_owned);
            self.emit(StoreEvent::ProgressChanged);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Copies the current position into persisted progress, outside START.
    pub(super) fn record_position(&mut self) {
        let Some(position) = self.state.position() else {
            return;
        };
        if self.state.progress.last_position.as_ref() != Some(&position) {
            self.state.progress.last_position = Some(position);
            self.emit(StoreEvent::ProgressChanged);
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("transition", &self.transition.as_ref().map(|t| t.id))
            .field("pending_timers", &self.timers.len())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

//=== StoreBuilder ========================================================

/// Fluent constructor for [`Store`].
pub struct StoreBuilder {
    config: KpiaConfig,
    clock: Arc<dyn Clock>,
    catalog: Arc<GalaxyCatalog>,
    profiles: Option<Arc<dyn ProfileStore>>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            config: KpiaConfig::default(),
            clock: Arc::new(SystemClock::new()),
            catalog: Arc::new(GalaxyCatalog::builtin()),
            profiles: None,
        }
    }

    /// # Panics
    ///
    /// Panics if `config` fails [`KpiaConfig::validate`].
    pub fn with_config(mut self, config: KpiaConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("Invalid config: {}", err);
        }
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_catalog(mut self, catalog: GalaxyCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_profile_store(mut self, profiles: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn build(self) -> Store {
        Store {
            state: AppState::new(self.config.default_kardashev_scale),
            config: self.config,
            clock: self.clock,
            timers: TimerQueue::new(),
            transition: None,
            next_transition: 0,
            startup_sequence: None,
            dive_sequence: None,
            catalog: self.catalog,
            profiles: self.profiles,
            events: Vec::new(),
        }
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::LastPosition;
    use crate::core::timing::ManualClock;

    //--- Test Helpers -----------------------------------------------------

    fn store() -> Store {
        Store::builder().with_clock(ManualClock::new()).build()
    }

    fn universe_store() -> Store {
        let mut store = store();
        store.set_scene(Scene::Universe);
        store.drain_events();
        store
    }

    //=== Setters =========================================================

    #[test]
    fn unknown_selection_is_accepted_but_matches_nothing() {
        let mut store = universe_store();

        store.set_selected_galaxy(Some("nonexistent-id"));

        assert_eq!(store.state().selection.selected.as_deref(), Some("nonexistent-id"));
        assert!(store.selected_galaxy().is_none());
        assert!(store.catalog().find("nonexistent-id").is_none());
    }

    #[test]
    fn known_selection_resolves_in_catalog() {
        let mut store = universe_store();
        store.set_selected_galaxy(Some("g-order"));
        assert_eq!(store.selected_galaxy().map(|g| g.name.as_str()), Some("WESTERN ORDER"));
    }

    #[test]
    fn unchanged_values_publish_nothing() {
        let mut store = store();
        store.set_muted(false);
        store.set_view_mode(ViewMode::Overview);
        store.set_menu(Menu::Map, false);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn scene_exit_clears_selection() {
        let mut store = universe_store();
        store.set_hovered_galaxy(Some("g-void"));
        store.set_selected_galaxy(Some("g-order"));
        store.set_alternate_mode(true);

        store.set_scene(Scene::Personal);

        assert!(store.state().selection.is_empty());
        assert!(!store.state().alternate_mode);
    }

    #[test]
    fn menus_toggle_independently() {
        let mut store = store();
        store.toggle_menu(Menu::Map);
        store.toggle_menu(Menu::Status);
        store.toggle_menu(Menu::Map);

        assert!(!store.state().menus.map);
        assert!(store.state().menus.status);
        assert_eq!(
            store.drain_events(),
            vec![
                StoreEvent::MenuToggled { menu: Menu::Map, open: true },
                StoreEvent::MenuToggled { menu: Menu::Status, open: true },
                StoreEvent::MenuToggled { menu: Menu::Map, open: false },
            ]
        );
    }

    #[test]
    fn close_all_reports_count() {
        let mut store = store();
        store.set_menu(Menu::Notes, true);
        store.set_menu(Menu::Social, true);

        assert_eq!(store.close_all_menus(), 2);
        assert!(!store.state().menus.any_open());
        assert_eq!(store.close_all_menus(), 0);
    }

    //=== Progress ========================================================

    #[test]
    fn position_is_recorded_outside_start() {
        let mut store = universe_store();
        store.set_selected_galaxy(Some("g-chaos"));
        store.set_view_mode(ViewMode::Detail);

        assert_eq!(
            store.state().progress.last_position,
            Some(LastPosition {
                scene: Scene::Universe,
                galaxy_id: Some("g-chaos".into()),
                view_mode: ViewMode::Detail,
            })
        );
        assert!(store.drain_events().iter().any(StoreEvent::dirties_progress));
    }

    #[test]
    fn position_is_not_recorded_on_start() {
        let mut store = store();
        store.set_selected_galaxy(Some("g-order"));
        assert_eq!(store.state().progress.last_position, None);
    }

    #[test]
    fn progress_setters_publish_change() {
        let mut store = store();
        store.set_erosion_level(0.4);
        store.set_kardashev_scale(2.0);
        store.set_display_id(Some("Nomad"));

        let events = store.drain_events();
        assert_eq!(events.iter().filter(|e| e.dirties_progress()).count(), 3);
        assert_eq!(store.state().progress.display_id.as_deref(), Some("Nomad"));
    }

    #[test]
    fn non_finite_progress_is_ignored() {
        let mut store = store();
        store.set_erosion_level(0.4);
        store.set_kardashev_scale(2.0);
        store.drain_events();

        store.set_erosion_level(f64::NAN);
        store.set_erosion_level(f64::NAN);
        store.set_kardashev_scale(f64::INFINITY);

        assert!(store.drain_events().is_empty());
        assert_eq!(store.state().progress.erosion_level, 0.4);
        assert_eq!(store.state().progress.kardashev_scale, 2.0);
    }

    //=== Dispatch ========================================================

    #[test]
    fn dispatch_routes_to_setters() {
        let mut store = universe_store();

        store.dispatch(Command::OpenMenu(Menu::Main));
        store.dispatch(Command::ToggleMute);
        store.dispatch(Command::SelectGalaxy(Some("g-nexus".into())));

        assert!(store.state().menus.main);
        assert!(store.state().muted);
        assert_eq!(store.state().selection.selected.as_deref(), Some("g-nexus"));

        store.dispatch(Command::CloseAllMenus);
        store.dispatch(Command::SelectGalaxy(None));
        assert!(!store.state().menus.any_open());
        assert!(store.state().selection.selected.is_none());
    }

    #[test]
    fn update_without_timers_fires_nothing() {
        let mut store = store();
        assert_eq!(store.update(), 0);
        assert_eq!(store.next_deadline(), None);
    }

    //=== Builder =========================================================

    #[test]
    #[should_panic(expected = "Invalid config")]
    fn builder_rejects_zero_transition_duration() {
        let config = KpiaConfig {
            transition_duration_ms: 0,
            ..KpiaConfig::default()
        };
        Store::builder().with_clock(ManualClock::new()).with_config(config);
    }

    #[test]
    #[should_panic(expected = "Invalid config")]
    fn builder_rejects_midpoint_outside_unit_range() {
        let config = KpiaConfig {
            transition_midpoint_ratio: 1.5,
            ..KpiaConfig::default()
        };
        Store::new(config);
    }
}
