//=========================================================================
// Profile Store
//=========================================================================
//
// Load/save contract against the user profile record, plus an in-memory
// backend for tests and offline play.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{PersistenceError, UserId};

//=== Profile =============================================================

/// Profile record as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: UserId,
    /// Raw game state blob; `None` if the user never saved.
    pub game_state: Option<serde_json::Value>,
}

//=== ProfileStore Trait ==================================================

/// Remote profile storage.
///
/// Implementations may block; the store calls them from the orchestration
/// thread only when a fetch or save is explicitly requested.
pub trait ProfileStore: Send + Sync {
    /// Reads a profile. A user with no record yields `Ok(None)`.
    fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>, PersistenceError>;

    /// Writes the game state blob, creating the record if needed.
    fn save_profile(&self, user: &UserId, game_state: serde_json::Value) -> Result<(), PersistenceError>;
}

//=== InMemoryProfileStore ================================================

/// Process-local profile storage with injectable outages.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<UserId, serde_json::Value>>,
    offline: AtomicBool,
    fetches: AtomicUsize,
    saves: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline, every call fails with [`PersistenceError::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Seeds a stored blob directly.
    pub fn insert(&self, user: UserId, game_state: serde_json::Value) {
        self.lock().insert(user, game_state);
    }

    /// Currently stored blob for `user`.
    pub fn game_state(&self, user: &UserId) -> Option<serde_json::Value> {
        self.lock().get(user).cloned()
    }

    /// Fetch attempts, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Save attempts, including failed ones.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, serde_json::Value>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.profiles.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_online(&self) -> Result<(), PersistenceError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(PersistenceError::Offline)
        } else {
            Ok(())
        }
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch_profile(&self, user: &UserId) -> Result<Option<Profile>, PersistenceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.lock().get(user).map(|blob| Profile {
            user_id: user.clone(),
            game_state: Some(blob.clone()),
        }))
    }

    fn save_profile(&self, user: &UserId, game_state: serde_json::Value) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        debug!("Stored game state for user {}", user);
        self.lock().insert(user.clone(), game_state);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_user_has_no_profile() {
        let store = InMemoryProfileStore::new();
        assert_eq!(store.fetch_profile(&UserId::new("ghost")).unwrap(), None);
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn save_upserts() {
        let store = InMemoryProfileStore::new();
        let user = UserId::new("u1");

        store.save_profile(&user, json!({ "erosionLevel": 0.1 })).unwrap();
        store.save_profile(&user, json!({ "erosionLevel": 0.2 })).unwrap();

        let profile = store.fetch_profile(&user).unwrap().expect("saved");
        assert_eq!(profile.game_state, Some(json!({ "erosionLevel": 0.2 })));
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn offline_fails_both_directions() {
        let store = InMemoryProfileStore::new();
        let user = UserId::new("u1");
        store.set_offline(true);

        assert!(matches!(store.save_profile(&user, json!({})), Err(PersistenceError::Offline)));
        assert!(matches!(store.fetch_profile(&user), Err(PersistenceError::Offline)));
        assert_eq!(store.game_state(&user), None);

        store.set_offline(false);
        assert!(store.save_profile(&user, json!({})).is_ok());
    }
}
