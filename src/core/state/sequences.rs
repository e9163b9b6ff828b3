//=========================================================================
// Startup & Dive Sequences
//=========================================================================
//
// Fine-grained timelines layered over the transition orchestrator.
//
// Startup (boot, title screen), ratios of `startup.total_ms`:
//
//   0 ── ZoomStart
//   text_show ── ShowText      text_hide ── HideText
//   zoom_end ── ZoomEnd
//   tip_show ── ShowTip        tip_hide ── HideTip
//   1 ── StartupComplete
//
// Dive (first entry into the universe), ratios of `dive.total_ms`:
//
//   0 ── DiveStart   awaken_ratio ── Awaken   1 ── DiveEnd
//
// Cues are plain data queued on the store's timer queue; applying a cue
// flips the matching `SequenceFlags`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::events::StoreEvent;
use super::store::{Store, StoreTask};
use crate::core::config::{DiveTimelineConfig, StartupTimelineConfig};
use crate::core::timing::Timeline;

//=== SequenceCue =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceCue {
    ZoomStart,
    ZoomEnd,
    ShowText,
    HideText,
    ShowTip,
    HideTip,
    StartupComplete,
    DiveStart,
    Awaken,
    DiveEnd,
}

//=== Timelines ===========================================================

pub fn startup_timeline(config: &StartupTimelineConfig) -> Timeline<SequenceCue> {
    let total = config.total();
    Timeline::new()
        .at(Duration::ZERO, SequenceCue::ZoomStart)
        .at_ratio(total, config.text_show, SequenceCue::ShowText)
        .at_ratio(total, config.text_hide, SequenceCue::HideText)
        .at_ratio(total, config.zoom_end, SequenceCue::ZoomEnd)
        .at_ratio(total, config.tip_show, SequenceCue::ShowTip)
        .at_ratio(total, config.tip_hide, SequenceCue::HideTip)
        .at(total, SequenceCue::StartupComplete)
}

pub fn dive_timeline(config: &DiveTimelineConfig) -> Timeline<SequenceCue> {
    let total = config.total();
    Timeline::new()
        .at(Duration::ZERO, SequenceCue::DiveStart)
        .at_ratio(total, config.awaken_ratio, SequenceCue::Awaken)
        .at(total, SequenceCue::DiveEnd)
}

//=== Sequence Control ====================================================

impl Store {
    //--- set_startup_active() ---------------------------------------------
    //
    // `true` (re)starts the intro from a fresh trigger instant.
    // `false` disposes it and hides every overlay it controls, so no
    // stale cue can reopen them after a skip.
    //
    pub fn set_startup_active(&mut self, active: bool) {
        if let Some(handle) = self.startup_sequence.take() {
            handle.dispose(&mut self.timers);
        }

        let flags = &mut self.state.sequence;
        flags.startup_active = active;
        flags.zooming = false;
        flags.startup_text_visible = false;
        flags.tip_visible = false;

        if active {
            let timeline = startup_timeline(&self.config.startup);
            let now = self.clock.now();
            self.startup_sequence = Some(timeline.start(now, &mut self.timers, StoreTask::Cue));
            info!("Startup sequence started");
        } else {
            debug!("Startup sequence inactive");
        }
    }

    /// Plays the one-shot dive. Returns `false` if it already played.
    pub fn begin_initial_dive(&mut self) -> bool {
        if self.state.sequence.initial_dive_done {
            debug!("Initial dive already played");
            return false;
        }
        self.state.sequence.initial_dive_done = true;

        if let Some(handle) = self.dive_sequence.take() {
            handle.dispose(&mut self.timers);
        }
        let timeline = dive_timeline(&self.config.dive);
        let now = self.clock.now();
        self.dive_sequence = Some(timeline.start(now, &mut self.timers, StoreTask::Cue));
        info!("Initial dive started");
        true
    }

    /// True while any cue of a started sequence is still queued.
    pub fn sequence_pending(&self) -> bool {
        self.startup_sequence
            .iter()
            .chain(self.dive_sequence.iter())
            .any(|handle| handle.remaining(&self.timers) > 0)
    }

    //--- apply_cue() ------------------------------------------------------

    pub(super) fn apply_cue(&mut self, cue: SequenceCue) {
        let flags = &mut self.state.sequence;
        match cue {
            SequenceCue::ZoomStart => flags.zooming = true,
            SequenceCue::ZoomEnd => flags.zooming = false,
            SequenceCue::ShowText => flags.startup_text_visible = true,
            SequenceCue::HideText => flags.startup_text_visible = false,
            SequenceCue::ShowTip => flags.tip_visible = true,
            SequenceCue::HideTip => flags.tip_visible = false,
            SequenceCue::StartupComplete => {
                flags.startup_active = false;
                self.startup_sequence = None;
            }
            SequenceCue::DiveStart => flags.diving = true,
            SequenceCue::Awaken => flags.awakening = true,
            SequenceCue::DiveEnd => {
                flags.diving = false;
                flags.awakening = false;
                self.dive_sequence = None;
            }
        }
        debug!("Cue {:?} applied", cue);
        self.emit(StoreEvent::CueFired(cue));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::KpiaConfig;
    use crate::core::scene::Scene;
    use crate::core::timing::ManualClock;

    //--- Test Helpers -----------------------------------------------------

    fn store() -> (Store, ManualClock) {
        let clock = ManualClock::new();
        let store = Store::builder().with_clock(clock.clone()).build();
        (store, clock)
    }

    fn at(store: &mut Store, clock: &ManualClock, millis: u64) {
        clock.set(Duration::from_millis(millis));
        store.update();
    }

    //=== Timelines =======================================================

    #[test]
    fn startup_cues_follow_configured_ratios() {
        let timeline = startup_timeline(&StartupTimelineConfig::default());
        let delays: Vec<_> = timeline
            .cues()
            .iter()
            .map(|c| (c.event, c.delay.as_millis()))
            .collect();

        assert_eq!(
            delays,
            vec![
                (SequenceCue::ZoomStart, 0),
                (SequenceCue::ShowText, 600),
                (SequenceCue::HideText, 2700),
                (SequenceCue::ZoomEnd, 3600),
                (SequenceCue::ShowTip, 3000),
                (SequenceCue::HideTip, 5400),
                (SequenceCue::StartupComplete, 6000),
            ]
        );
    }

    #[test]
    fn dive_awakens_partway() {
        let timeline = dive_timeline(&DiveTimelineConfig::default());
        assert_eq!(timeline.span(), Duration::from_millis(2500));
        assert_eq!(timeline.cues()[1].delay, Duration::from_millis(1500));
    }

    //=== Startup =========================================================

    #[test]
    fn startup_overlays_open_and_close_on_schedule() {
        let (mut store, clock) = store();
        store.set_startup_active(true);

        at(&mut store, &clock, 0);
        assert!(store.state().sequence.zooming);
        assert!(!store.state().sequence.startup_text_visible);

        at(&mut store, &clock, 600);
        assert!(store.state().sequence.startup_text_visible);

        at(&mut store, &clock, 3000);
        assert!(!store.state().sequence.startup_text_visible);
        assert!(store.state().sequence.tip_visible);

        at(&mut store, &clock, 3600);
        assert!(!store.state().sequence.zooming);

        at(&mut store, &clock, 6000);
        assert!(!store.state().sequence.tip_visible);
        assert!(!store.state().sequence.startup_active);
        assert!(!store.sequence_pending());
    }

    #[test]
    fn skipping_intro_cancels_remaining_cues() {
        let (mut store, clock) = store();
        store.set_startup_active(true);
        at(&mut store, &clock, 700);
        assert!(store.state().sequence.startup_text_visible);

        store.set_startup_active(false);
        assert!(!store.sequence_pending());
        assert!(!store.state().sequence.startup_text_visible);

        store.drain_events();
        at(&mut store, &clock, 10_000);
        assert!(!store.state().sequence.tip_visible);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn restart_uses_fresh_trigger() {
        let (mut store, clock) = store();
        store.set_startup_active(true);

        clock.set(Duration::from_millis(1000));
        store.set_startup_active(true);

        at(&mut store, &clock, 1599);
        assert!(!store.state().sequence.startup_text_visible);
        at(&mut store, &clock, 1600);
        assert!(store.state().sequence.startup_text_visible);
    }

    //=== Dive ============================================================

    #[test]
    fn initial_dive_plays_once() {
        let (mut store, clock) = store();

        assert!(store.begin_initial_dive());
        at(&mut store, &clock, 0);
        assert!(store.state().sequence.diving);

        at(&mut store, &clock, 1500);
        assert!(store.state().sequence.awakening);

        at(&mut store, &clock, 2500);
        assert!(!store.state().sequence.diving);
        assert!(!store.state().sequence.awakening);

        assert!(!store.begin_initial_dive());
        assert!(!store.sequence_pending());
    }

    #[test]
    fn entering_universe_stops_intro_then_dives() {
        let (mut store, clock) = store();
        store.set_startup_active(true);

        store.enter_universe().expect("started from start");

        at(&mut store, &clock, 1600);
        assert_eq!(store.state().scene, Scene::Universe);
        assert!(!store.state().sequence.startup_active);
        assert!(!store.state().sequence.diving);

        at(&mut store, &clock, 2000);
        assert!(store.state().sequence.diving);
        assert!(store.state().sequence.initial_dive_done);

        at(&mut store, &clock, 4500);
        assert!(!store.state().sequence.diving);
    }

    #[test]
    fn custom_dive_config_applies() {
        let clock = ManualClock::new();
        let mut config = KpiaConfig::default();
        config.dive.total_ms = 1000;
        config.dive.awaken_ratio = 0.5;
        let mut store = Store::builder().with_config(config).with_clock(clock.clone()).build();

        store.begin_initial_dive();
        at(&mut store, &clock, 500);
        assert!(store.state().sequence.awakening);
        at(&mut store, &clock, 1000);
        assert!(!store.state().sequence.diving);
    }
}
