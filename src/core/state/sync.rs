//=========================================================================
// Profile Sync
//=========================================================================
//
// Store-side persistence actions: session changes, profile load/save and
// the logout reset.
//
// Every backend failure stops here. It is logged and the store keeps the
// state it already had; nothing is returned as an error to callers on
// the input or render path.
//
//=========================================================================

//=== External Dependencies ===============================================

use chrono::Utc;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::app_state::{AppState, PersistedProgress};
use super::events::StoreEvent;
use super::store::Store;
use crate::core::persistence::{GameState, Session};

//=== SaveOutcome =========================================================

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// No signed-in user or no profile backend; nothing to do.
    Skipped,
    /// The backend rejected or never received the write.
    Failed,
}

//=== Persistence Actions =================================================

impl Store {
    //--- Session ----------------------------------------------------------

    /// Installs a session and loads the user's profile.
    ///
    /// Signing in again as the same user only replaces the session.
    pub fn sign_in(&mut self, session: Session) {
        if let Some(current) = self.state.session.as_ref() {
            if current.user_id() == session.user_id() {
                debug!("Session for {} replaced", session.user_id());
                self.state.session = Some(session);
                return;
            }
        }

        info!("User {} signed in", session.user_id());
        self.state.session = Some(session);
        self.state.progress = PersistedProgress::new(self.config.default_kardashev_scale);
        self.emit(StoreEvent::SessionChanged { signed_in: true });
        self.fetch_user_profile();
    }

    /// Swaps in a refreshed token for the current user.
    pub fn refresh_session(&mut self, session: Session) {
        match self.state.session.as_ref() {
            Some(current) if current.user_id() == session.user_id() => {
                debug!("Token refreshed for {}", session.user_id());
                self.state.session = Some(session);
            }
            _ => self.sign_in(session),
        }
    }

    /// Clears the session and resets all state.
    pub fn sign_out(&mut self) {
        let was_signed_in = self.state.session.is_some();
        if was_signed_in {
            info!("User signed out");
        }
        self.reset_state();
        if was_signed_in {
            self.emit(StoreEvent::SessionChanged { signed_in: false });
        }
    }

    //--- fetch_user_profile() ---------------------------------------------
    //
    // Reads the signed-in user's stored game state into progress. Fields
    // missing from the blob, or the whole blob, default. On backend
    // failure progress is left as it was. Returns `true` if a stored
    // blob was applied.
    //
    pub fn fetch_user_profile(&mut self) -> bool {
        let (Some(session), Some(profiles)) = (self.state.session.as_ref(), self.profiles.as_ref()) else {
            debug!("Profile fetch skipped: no user or no profile store");
            return false;
        };
        let user = session.user_id().clone();

        let blob = match profiles.fetch_profile(&user) {
            Ok(profile) => profile.and_then(|p| p.game_state),
            Err(e) => {
                warn!("Failed to fetch profile for {}: {}", user, e);
                return false;
            }
        };

        let default_scale = self.config.default_kardashev_scale;
        let (progress, applied) = match blob.map(GameState::from_json) {
            Some(Ok(game_state)) => (game_state.into_progress(default_scale), true),
            Some(Err(e)) => {
                warn!("Stored game state for {} is unreadable: {}", user, e);
                (PersistedProgress::new(default_scale), false)
            }
            None => (PersistedProgress::new(default_scale), false),
        };

        self.state.progress = progress;
        debug!("Profile loaded for {} (stored state: {})", user, applied);
        self.emit(StoreEvent::ProfileLoaded);
        applied
    }

    //--- save_current_state() ---------------------------------------------

    /// Writes persisted progress for the signed-in user.
    pub fn save_current_state(&mut self) -> SaveOutcome {
        let (Some(session), Some(profiles)) = (self.state.session.as_ref(), self.profiles.as_ref()) else {
            debug!("Save skipped: no user or no profile store");
            return SaveOutcome::Skipped;
        };

        let result = GameState::capture(&self.state.progress, Utc::now())
            .to_json()
            .and_then(|blob| profiles.save_profile(session.user_id(), blob));

        match result {
            Ok(()) => {
                debug!("Progress saved for {}", session.user_id());
                self.emit(StoreEvent::ProgressSaved);
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!("Failed to save progress for {}: {}", session.user_id(), e);
                SaveOutcome::Failed
            }
        }
    }

    //--- reset_state() ----------------------------------------------------
    //
    // Back to a fresh start screen: in-flight transition and sequences
    // cancelled, every field defaulted (session included).
    //
    pub fn reset_state(&mut self) {
        self.cancel_transition();
        if let Some(handle) = self.startup_sequence.take() {
            handle.dispose(&mut self.timers);
        }
        if let Some(handle) = self.dive_sequence.take() {
            handle.dispose(&mut self.timers);
        }
        self.timers.clear();

        self.state = AppState::new(self.config.default_kardashev_scale);
        info!("State reset");
        self.emit(StoreEvent::StateReset);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::{InMemoryProfileStore, ProfileStore, User, UserId};
    use crate::core::scene::{Scene, ViewMode};
    use crate::core::state::{LastPosition, Menu};
    use crate::core::timing::ManualClock;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    //--- Test Helpers -----------------------------------------------------

    fn session(id: &str) -> Session {
        Session::new(User { id: UserId::new(id), email: None }, "token")
    }

    fn store(profiles: &Arc<InMemoryProfileStore>) -> (Store, ManualClock) {
        let clock = ManualClock::new();
        let store = Store::builder()
            .with_clock(clock.clone())
            .with_profile_store(profiles.clone())
            .build();
        (store, clock)
    }

    //=== Round Trip ======================================================

    #[test]
    fn save_then_fetch_in_fresh_session_restores_progress() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut first, _) = store(&profiles);
        first.sign_in(session("u1"));
        first.set_scene(Scene::Universe);
        first.set_selected_galaxy(Some("g-order"));
        first.set_view_mode(ViewMode::Detail);
        first.set_erosion_level(0.1 + 0.2);
        first.set_kardashev_scale(1.0 / 3.0);
        first.set_display_id(Some("Pilot-7"));

        assert_eq!(first.save_current_state(), SaveOutcome::Saved);

        let (mut second, _) = store(&profiles);
        second.sign_in(session("u1"));

        assert_eq!(second.state().progress, first.state().progress);
        assert_eq!(
            second.state().progress.last_position,
            Some(LastPosition {
                scene: Scene::Universe,
                galaxy_id: Some("g-order".into()),
                view_mode: ViewMode::Detail,
            })
        );
    }

    #[test]
    fn missing_fields_default_on_fetch() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        profiles.insert(UserId::new("u1"), json!({ "erosionLevel": 0.7 }));
        let (mut store, _) = store(&profiles);

        store.sign_in(session("u1"));

        let progress = &store.state().progress;
        assert_eq!(progress.erosion_level, 0.7);
        assert_eq!(progress.kardashev_scale, 1.24);
        assert_eq!(progress.last_position, None);
        assert_eq!(progress.display_id, None);
    }

    #[test]
    fn failed_fetch_leaves_defaults() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        profiles.insert(UserId::new("u1"), json!({ "erosionLevel": 0.7 }));
        profiles.set_offline(true);
        let (mut store, _) = store(&profiles);

        store.sign_in(session("u1"));

        assert!(store.state().is_authenticated());
        assert_eq!(store.state().progress, PersistedProgress::default());
        assert_eq!(profiles.fetch_count(), 1);
    }

    #[test]
    fn unreadable_blob_is_treated_as_absent() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        profiles.insert(UserId::new("u1"), json!({ "kardashevScale": "very high" }));
        let (mut store, _) = store(&profiles);

        store.sign_in(session("u1"));
        assert!(!store.fetch_user_profile());
        assert_eq!(store.state().progress.kardashev_scale, 1.24);
    }

    //=== Save ============================================================

    #[test]
    fn save_without_user_is_skipped() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.set_erosion_level(0.5);

        assert_eq!(store.save_current_state(), SaveOutcome::Skipped);
        assert_eq!(profiles.save_count(), 0);
    }

    #[test]
    fn save_without_backend_is_skipped() {
        let mut store = Store::builder().with_clock(ManualClock::new()).build();
        store.sign_in(session("u1"));
        assert_eq!(store.save_current_state(), SaveOutcome::Skipped);
    }

    #[test]
    fn failed_save_keeps_local_state() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.set_erosion_level(0.9);
        profiles.set_offline(true);

        assert_eq!(store.save_current_state(), SaveOutcome::Failed);
        assert_eq!(store.state().progress.erosion_level, 0.9);
        assert_eq!(profiles.game_state(&UserId::new("u1")), None);
    }

    #[test]
    fn saved_blob_carries_timestamp() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.save_current_state();

        let blob = profiles.fetch_profile(&UserId::new("u1")).unwrap().unwrap().game_state.unwrap();
        assert!(blob["updatedAt"].is_string());
        assert!(blob["lastPosition"].is_null());
    }

    //=== Session =========================================================

    #[test]
    fn same_user_sign_in_does_not_refetch() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.set_erosion_level(0.4);

        store.sign_in(session("u1"));

        assert_eq!(profiles.fetch_count(), 1);
        assert_eq!(store.state().progress.erosion_level, 0.4);
    }

    #[test]
    fn switching_user_loads_their_progress() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        profiles.insert(UserId::new("u2"), json!({ "displayId": "Second" }));
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.set_display_id(Some("First"));

        store.sign_in(session("u2"));

        assert_eq!(store.state().progress.display_id.as_deref(), Some("Second"));
    }

    //=== Reset ===========================================================

    #[test]
    fn reset_restores_exact_defaults() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.set_scene(Scene::Personal);
        store.set_view_mode(ViewMode::Detail);
        store.set_selected_galaxy(Some("g-order"));
        store.set_erosion_level(0.8);
        store.set_kardashev_scale(3.5);
        store.set_display_id(Some("Pilot"));
        for menu in Menu::ALL {
            store.set_menu(menu, true);
        }

        store.reset_state();

        let state = store.state();
        assert_eq!(state.scene, Scene::Start);
        assert_eq!(state.view_mode, ViewMode::Overview);
        assert_eq!(state.selection.selected, None);
        assert_eq!(state.progress.erosion_level, 0.0);
        assert_eq!(state.progress.kardashev_scale, 1.24);
        assert_eq!(state.progress.last_position, None);
        assert_eq!(state.progress.display_id, None);
        assert!(!state.menus.any_open());
        assert_eq!(state, &AppState::default());
    }

    #[test]
    fn reset_cancels_in_flight_work() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, clock) = store(&profiles);
        store.set_startup_active(true);
        store.set_scene(Scene::Universe);
        let id = store.toggle_scene_mode().expect("started");

        store.reset_state();
        assert!(!store.transition_in_flight());
        assert_eq!(store.next_deadline(), None);

        clock.set(Duration::from_secs(10));
        store.update();
        assert_eq!(store.state(), &AppState::default());
        assert!(store.drain_events().contains(&StoreEvent::TransitionCancelled { id }));
    }

    #[test]
    fn sign_out_resets_and_reports() {
        let profiles = Arc::new(InMemoryProfileStore::new());
        let (mut store, _) = store(&profiles);
        store.sign_in(session("u1"));
        store.set_erosion_level(0.6);
        store.drain_events();

        store.sign_out();

        assert!(store.state().session.is_none());
        assert_eq!(store.state().progress, PersistedProgress::default());
        assert_eq!(
            store.drain_events(),
            vec![StoreEvent::StateReset, StoreEvent::SessionChanged { signed_in: false }]
        );
    }
}
