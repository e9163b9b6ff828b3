//=========================================================================
// Persistence
//=========================================================================
//
// Auth session bridge, profile load/save contract and debounced auto-save.
//
// Nothing in this module touches the render path: failures come back as
// `PersistenceError` and are logged by the store's persistence actions.
//
//=========================================================================

mod autosave;
mod error;
mod file_store;
mod game_state;
mod profile_store;
mod session;

pub use autosave::AutoSaver;
pub use error::PersistenceError;
pub use file_store::FileProfileStore;
pub use game_state::GameState;
pub use profile_store::{InMemoryProfileStore, Profile, ProfileStore};
pub use session::{
    auth_channel, AnonymousAuth, AuthEvent, AuthEventSender, AuthListener, AuthProvider, Session, SessionService,
    User, UserId,
};
