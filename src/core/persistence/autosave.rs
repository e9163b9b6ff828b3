//=========================================================================
// Auto-Saver
//=========================================================================
//
// Debounced background save of persisted progress.
//
// Flow:
//   store.drain_events() ──observe()──> deadline = now + debounce
//                                            │ (reset on every change)
//   poll(store) ── now >= deadline ──> store.save_current_state()
//
// A failed save re-arms the deadline, so the next debounce window
// retries. Saves with no signed-in user are skipped and disarm it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::state::{SaveOutcome, Store, StoreEvent};

//=== AutoSaver ===========================================================

#[derive(Debug, Clone)]
pub struct AutoSaver {
    debounce: Duration,
    deadline: Option<Duration>,
    running: bool,
}

impl AutoSaver {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: None,
            running: false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn start(&mut self) {
        self.running = true;
        debug!("Auto-save started ({:?} debounce)", self.debounce);
    }

    /// Stops observing changes and drops any pending deadline.
    ///
    /// Call [`flush`](Self::flush) first to keep pending progress.
    pub fn stop(&mut self) {
        self.running = false;
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while a change is waiting for its debounce window.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    //--- Scheduling -------------------------------------------------------

    /// Re-arms the debounce window if any event dirtied progress.
    pub fn observe(&mut self, events: &[StoreEvent], now: Duration) {
        if !self.running {
            return;
        }
        if events.iter().any(StoreEvent::dirties_progress) {
            self.deadline = Some(now + self.debounce);
        }
    }

    /// Saves if the debounce window has elapsed.
    pub fn poll(&mut self, store: &mut Store) -> Option<SaveOutcome> {
        let deadline = self.deadline?;
        let now = store.now();
        if now < deadline {
            return None;
        }
        Some(self.save(store, now))
    }

    /// Saves immediately if a change is pending.
    pub fn flush(&mut self, store: &mut Store) -> Option<SaveOutcome> {
        self.deadline?;
        let now = store.now();
        Some(self.save(store, now))
    }

    fn save(&mut self, store: &mut Store, now: Duration) -> SaveOutcome {
        let outcome = store.save_current_state();
        self.deadline = match outcome {
            SaveOutcome::Failed => {
                info!("Auto-save failed; retrying in {:?}", self.debounce);
                Some(now + self.debounce)
            }
            SaveOutcome::Saved | SaveOutcome::Skipped => None,
        };
        outcome
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::{InMemoryProfileStore, Session, User, UserId};
    use crate::core::timing::{Clock, ManualClock};
    use std::sync::Arc;

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        clock: ManualClock,
        profiles: Arc<InMemoryProfileStore>,
        store: Store,
        saver: AutoSaver,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::new();
        let profiles = Arc::new(InMemoryProfileStore::new());
        let mut store = Store::builder()
            .with_clock(clock.clone())
            .with_profile_store(profiles.clone())
            .build();
        store.sign_in(Session::new(
            User { id: UserId::new("u1"), email: None },
            "token",
        ));
        store.drain_events();

        let mut saver = AutoSaver::new(Duration::from_secs(3));
        saver.start();
        Fixture { clock, profiles, store, saver }
    }

    fn change(f: &mut Fixture, erosion: f64) {
        f.store.set_erosion_level(erosion);
        let events = f.store.drain_events();
        f.saver.observe(&events, f.clock.now());
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn saves_after_quiet_period() {
        let mut f = fixture();
        change(&mut f, 0.2);

        f.clock.advance(Duration::from_millis(2999));
        assert_eq!(f.saver.poll(&mut f.store), None);

        f.clock.advance(Duration::from_millis(1));
        assert_eq!(f.saver.poll(&mut f.store), Some(SaveOutcome::Saved));
        assert_eq!(f.profiles.save_count(), 1);
        assert!(!f.saver.is_pending());
    }

    #[test]
    fn each_change_resets_the_window() {
        let mut f = fixture();
        change(&mut f, 0.1);
        f.clock.advance(Duration::from_secs(2));
        change(&mut f, 0.2);
        f.clock.advance(Duration::from_secs(2));

        assert_eq!(f.saver.poll(&mut f.store), None);

        f.clock.advance(Duration::from_secs(1));
        assert_eq!(f.saver.poll(&mut f.store), Some(SaveOutcome::Saved));
        assert_eq!(f.profiles.save_count(), 1);
    }

    #[test]
    fn failed_save_retries_next_window() {
        let mut f = fixture();
        change(&mut f, 0.4);
        f.profiles.set_offline(true);

        f.clock.advance(Duration::from_secs(3));
        assert_eq!(f.saver.poll(&mut f.store), Some(SaveOutcome::Failed));
        assert!(f.saver.is_pending());

        f.profiles.set_offline(false);
        f.clock.advance(Duration::from_secs(3));
        assert_eq!(f.saver.poll(&mut f.store), Some(SaveOutcome::Saved));
        assert_eq!(f.profiles.save_count(), 2);
    }

    #[test]
    fn flush_saves_immediately() {
        let mut f = fixture();
        change(&mut f, 0.3);

        assert_eq!(f.saver.flush(&mut f.store), Some(SaveOutcome::Saved));
        assert_eq!(f.saver.flush(&mut f.store), None);
    }

    #[test]
    fn stopped_saver_ignores_changes() {
        let mut f = fixture();
        f.saver.stop();
        change(&mut f, 0.3);

        f.clock.advance(Duration::from_secs(10));
        assert_eq!(f.saver.poll(&mut f.store), None);
        assert_eq!(f.profiles.save_count(), 0);
    }

    #[test]
    fn signed_out_save_is_skipped() {
        let mut f = fixture();
        f.store.sign_out();
        f.store.drain_events();
        change(&mut f, 0.3);

        f.clock.advance(Duration::from_secs(3));
        assert_eq!(f.saver.poll(&mut f.store), Some(SaveOutcome::Skipped));
        assert!(!f.saver.is_pending());
        assert_eq!(f.profiles.save_count(), 0);
    }

    #[test]
    fn unrelated_events_do_not_arm() {
        let mut f = fixture();
        f.store.toggle_mute();
        let events = f.store.drain_events();
        f.saver.observe(&events, f.clock.now());
        assert!(!f.saver.is_pending());
    }
}
