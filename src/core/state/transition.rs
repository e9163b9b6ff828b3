//=========================================================================
// Transition Orchestrator
//=========================================================================
//
// Three-phase scene changes, masked by the loading overlay.
//
// Timeline of one transition of duration D:
//
//   t = 0        START     is_transitioning = is_loading = true, label shown
//   t = D * 0.8  MIDPOINT  scene / view / selection swapped under cover
//   t = D        END       flags cleared, completion callback runs
//
// Each transition owns a timer group (its cancel token) and an id that
// rides along with every queued phase. Only one transition is in flight
// at a time; what happens to a second request is decided by
// `TransitionPolicy`. Phases whose id no longer matches the in-flight
// transition are ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::app_state::Menu;
use super::events::StoreEvent;
use super::store::{Store, StoreTask};
use crate::core::config::TransitionPolicy;
use crate::core::scene::{Scene, ViewMode};
use crate::core::timing::{fraction_of, TimerGroup};

//=== TransitionId ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition#{}", self.0)
    }
}

//=== TransitionPhase =====================================================

/// Delayed phases. START runs synchronously when the transition begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Midpoint,
    End,
}

//=== TransitionOptions ===================================================

/// Callback run by a transition phase with full store access.
pub type TransitionCallback = Box<dyn FnOnce(&mut Store) + Send>;

/// Parameters for [`Store::execute_scene_transition`].
pub struct TransitionOptions {
    target_view: ViewMode,
    galaxy_id: Option<String>,
    loading_text: String,
    duration: Option<Duration>,
    on_midpoint: Option<TransitionCallback>,
    on_complete: Option<TransitionCallback>,
}

impl TransitionOptions {
    /// Overview, selection untouched, configured duration, no label.
    pub fn new() -> Self {
        Self {
            target_view: ViewMode::Overview,
            galaxy_id: None,
            loading_text: String::new(),
            duration: None,
            on_midpoint: None,
            on_complete: None,
        }
    }

    pub fn target_view(mut self, view: ViewMode) -> Self {
        self.target_view = view;
        self
    }

    /// Galaxy selected at the midpoint.
    pub fn galaxy(mut self, id: impl Into<String>) -> Self {
        self.galaxy_id = Some(id.into());
        self
    }

    pub fn loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    /// Overrides the configured transition duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn on_midpoint(mut self, callback: impl FnOnce(&mut Store) + Send + 'static) -> Self {
        self.on_midpoint = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce(&mut Store) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionOptions")
            .field("target_view", &self.target_view)
            .field("galaxy_id", &self.galaxy_id)
            .field("loading_text", &self.loading_text)
            .field("duration", &self.duration)
            .field("on_midpoint", &self.on_midpoint.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

//=== ActiveTransition ====================================================

/// The in-flight transition's state machine.
pub(super) struct ActiveTransition {
    pub(super) id: TransitionId,
    pub(super) group: TimerGroup,
    pub(super) target: Scene,
    pub(super) target_view: ViewMode,
    pub(super) galaxy_id: Option<String>,
    pub(super) reached_midpoint: bool,
    pub(super) on_midpoint: Option<TransitionCallback>,
    pub(super) on_complete: Option<TransitionCallback>,
}

//=== Transition Actions ==================================================

impl Store {
    /// True while a transition is between START and END.
    pub fn transition_in_flight(&self) -> bool {
        self.transition.is_some()
    }

    pub fn active_transition(&self) -> Option<TransitionId> {
        self.transition.as_ref().map(|t| t.id)
    }

    //--- execute_scene_transition() ---------------------------------------
    //
    // Runs START now and queues MIDPOINT and END. Returns `None` if the
    // request was rejected because another transition is in flight.
    //
    pub fn execute_scene_transition(&mut self, target: Scene, options: TransitionOptions) -> Option<TransitionId> {
        if let Some(active) = self.transition.as_ref() {
            match self.config.transition_policy {
                TransitionPolicy::Reject => {
                    debug!("Transition to {:?} rejected: {} in flight", target, active.id);
                    return None;
                }
                TransitionPolicy::Supersede => self.cancel_transition(),
            }
        }

        let id = TransitionId(self.next_transition);
        self.next_transition += 1;

        let now = self.clock.now();
        let duration = options.duration.unwrap_or_else(|| self.config.transition_duration());
        let midpoint = fraction_of(duration, self.config.transition_midpoint_ratio);

        let group = self.timers.new_group();
        self.timers.schedule_in_group(
            group,
            now + midpoint,
            StoreTask::Transition { id, phase: TransitionPhase::Midpoint },
        );
        self.timers.schedule_in_group(
            group,
            now + duration,
            StoreTask::Transition { id, phase: TransitionPhase::End },
        );

        //--- Phase START ---
        self.state.transition.is_transitioning = true;
        self.state.transition.is_loading = true;
        self.state.transition.loading_text = options.loading_text;

        self.transition = Some(ActiveTransition {
            id,
            group,
            target,
            target_view: options.target_view,
            galaxy_id: options.galaxy_id,
            reached_midpoint: false,
            on_midpoint: options.on_midpoint,
            on_complete: options.on_complete,
        });

        info!("{} to {:?} started ({:?})", id, target, duration);
        self.emit(StoreEvent::TransitionStarted { id, target });
        Some(id)
    }

    //--- Specializations --------------------------------------------------

    /// Closes the map and transitions to the galaxy's detail view.
    pub fn warp_to_galaxy(&mut self, id: &str, name: &str) -> Option<TransitionId> {
        self.set_menu(Menu::Map, false);
        let options = TransitionOptions::new()
            .target_view(ViewMode::Detail)
            .galaxy(id)
            .loading_text(format!("WARPING TO {}", name.to_uppercase()));
        self.execute_scene_transition(Scene::Universe, options)
    }

    /// Back to the title screen in overview with nothing selected.
    pub fn return_to_start(&mut self) -> Option<TransitionId> {
        if !self.can_leave_scene("return_to_start") {
            return None;
        }
        self.execute_scene_transition(
            Scene::Start,
            TransitionOptions::new().loading_text("RETURNING TO ORIGIN"),
        )
    }

    /// Flips between the universe and the personal helix space.
    ///
    /// Any scene other than PERSONAL goes to PERSONAL.
    pub fn toggle_scene_mode(&mut self) -> Option<TransitionId> {
        if !self.can_leave_scene("toggle_scene_mode") {
            return None;
        }
        let (target, label) = match self.state.scene {
            Scene::Personal => (Scene::Universe, "RETURNING TO UNIVERSE"),
            _ => (Scene::Personal, "ENTERING PERSONAL SPACE"),
        };
        self.execute_scene_transition(target, TransitionOptions::new().loading_text(label))
    }

    /// Leaves the title screen for the universe.
    ///
    /// The intro sequence stops at the midpoint; the initial dive starts
    /// on completion the first time only.
    pub fn enter_universe(&mut self) -> Option<TransitionId> {
        if self.state.scene != Scene::Start || self.state.transition.is_loading {
            debug!("enter_universe ignored in {:?}", self.state.scene);
            return None;
        }
        let options = TransitionOptions::new()
            .loading_text("INITIALIZING UNIVERSE")
            .on_midpoint(|store| store.set_startup_active(false))
            .on_complete(|store| {
                store.begin_initial_dive();
            });
        self.execute_scene_transition(Scene::Universe, options)
    }

    pub fn enter_skill_scene(&mut self) -> Option<TransitionId> {
        if !self.can_leave_scene("enter_skill_scene") {
            return None;
        }
        if self.state.scene == Scene::Skill {
            return None;
        }
        self.execute_scene_transition(
            Scene::Skill,
            TransitionOptions::new().loading_text("LOADING SKILL MATRIX"),
        )
    }

    //--- Phase Execution --------------------------------------------------

    pub(super) fn run_transition_phase(&mut self, id: TransitionId, phase: TransitionPhase) {
        if self.active_transition() != Some(id) {
            debug!("Ignoring stale {:?} for {}", phase, id);
            return;
        }
        match phase {
            TransitionPhase::Midpoint => self.transition_midpoint(),
            TransitionPhase::End => self.transition_end(),
        }
    }

    fn transition_midpoint(&mut self) {
        let Some(active) = self.transition.as_mut() else {
            return;
        };
        active.reached_midpoint = true;
        let id = active.id;
        let target = active.target;
        let target_view = active.target_view;
        let galaxy_id = active.galaxy_id.take();
        let callback = active.on_midpoint.take();

        let from = self.state.scene;
        if from != target {
            self.state.scene = target;
            self.set_hovered_galaxy(None);
            if galaxy_id.is_none() {
                self.set_selected_galaxy(None);
            }
            self.emit(StoreEvent::SceneChanged { from, to: target });
        }
        if let Some(galaxy) = galaxy_id.as_deref() {
            self.set_selected_galaxy(Some(galaxy));
        }
        self.state.alternate_mode = false;
        self.set_view_mode(target_view);
        self.record_position();

        debug!("{} midpoint: now in {:?}/{:?}", id, target, target_view);
        self.emit(StoreEvent::TransitionMidpoint { id, scene: target });

        if let Some(callback) = callback {
            callback(self);
        }
    }

    fn transition_end(&mut self) {
        let Some(mut active) = self.transition.take() else {
            return;
        };

        self.state.transition.is_transitioning = false;
        self.state.transition.is_loading = false;
        self.state.transition.loading_text.clear();

        info!("{} completed", active.id);
        self.emit(StoreEvent::TransitionCompleted { id: active.id });

        if let Some(callback) = active.on_complete.take() {
            callback(self);
        }
    }

    //--- Cancellation -----------------------------------------------------

    /// Drops the in-flight transition and its pending phases.
    ///
    /// Whatever the cancelled transition already swapped stays swapped;
    /// its callbacks never run.
    pub(super) fn cancel_transition(&mut self) {
        let Some(active) = self.transition.take() else {
            return;
        };
        let cancelled = self.timers.cancel_group(active.group);
        debug!(
            "{} cancelled ({} phases dropped, midpoint reached: {})",
            active.id, cancelled, active.reached_midpoint
        );
        self.state.transition.is_transitioning = false;
        self.state.transition.is_loading = false;
        self.state.transition.loading_text.clear();
        self.emit(StoreEvent::TransitionCancelled { id: active.id });
    }

    //--- Guards -----------------------------------------------------------

    fn can_leave_scene(&self, action: &str) -> bool {
        if self.state.scene == Scene::Start || self.state.transition.is_loading {
            debug!(
                "{} ignored (scene {:?}, loading {})",
                action, self.state.scene, self.state.transition.is_loading
            );
            return false;
        }
        true
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
