//=========================================================================
// Auth Session
//=========================================================================
//
// Identity handles and the auth-state subscription.
//
// Architecture:
//   Backend thread(s) ──AuthEventSender──> crossbeam channel
//                                               │
//   SessionService::pump(store) <──AuthListener─┘   (orchestration thread)
//
// The backend may report auth changes from any thread. Events queue on
// the channel and are applied to the store at tick boundaries, so the
// store itself stays single-threaded.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::PersistenceError;
use crate::core::state::Store;

/// Upper bound on auth events applied per pump.
const MAX_EVENTS_PER_PUMP: usize = 32;

//=== Identity ============================================================

/// Backend user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Option<String>,
}

/// Opaque session handle issued by the auth backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

impl Session {
    pub fn new(user: User, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

// Keeps tokens out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

//=== AuthProvider Trait ==================================================

/// Auth backend queried once at start for an existing session.
pub trait AuthProvider: Send + Sync {
    fn current_session(&self) -> Result<Option<Session>, PersistenceError>;
}

/// Provider for offline play: there is never a session to restore.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousAuth;

impl AuthProvider for AnonymousAuth {
    fn current_session(&self) -> Result<Option<Session>, PersistenceError> {
        Ok(None)
    }
}

//=== AuthEvent ===========================================================

/// Auth state change reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

//=== Channel =============================================================

/// Cloneable, thread-safe sending half of the auth subscription.
#[derive(Debug, Clone)]
pub struct AuthEventSender {
    sender: Sender<AuthEvent>,
}

impl AuthEventSender {
    /// Queues an event. Returns `false` if the listener is gone.
    pub fn send(&self, event: AuthEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Receiving half, owned by the [`SessionService`].
#[derive(Debug)]
pub struct AuthListener {
    receiver: Receiver<AuthEvent>,
}

/// Creates a connected sender/listener pair.
pub fn auth_channel() -> (AuthEventSender, AuthListener) {
    let (sender, receiver) = unbounded();
    (AuthEventSender { sender }, AuthListener { receiver })
}

//=== SessionService ======================================================

/// Long-lived bridge between auth events and the store.
#[derive(Debug)]
pub struct SessionService {
    listener: AuthListener,
    running: bool,
}

impl SessionService {
    pub fn new(listener: AuthListener) -> Self {
        Self {
            listener,
            running: false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Checks for an existing session and starts applying auth events.
    ///
    /// A failed session check is logged and treated as signed out.
    pub fn start(&mut self, auth: &dyn AuthProvider, store: &mut Store) {
        self.running = true;
        match auth.current_session() {
            Ok(Some(session)) => {
                info!("Restoring session for user {}", session.user_id());
                store.sign_in(session);
            }
            Ok(None) => debug!("No active session at start"),
            Err(e) => warn!("Session check failed: {}", e),
        }
    }

    /// Stops applying events. Queued events stay queued until restarted.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    //--- Event Processing -------------------------------------------------

    /// Applies queued auth events to the store. Returns how many were applied.
    pub fn pump(&mut self, store: &mut Store) -> usize {
        if !self.running {
            return 0;
        }

        let mut applied = 0;
        while applied < MAX_EVENTS_PER_PUMP {
            match self.listener.receiver.try_recv() {
                Ok(event) => {
                    Self::apply(event, store);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Auth event sender dropped");
                    break;
                }
            }
        }

        if applied >= MAX_EVENTS_PER_PUMP {
            warn!("Auth event backlog: applied {} events this tick", applied);
        }
        applied
    }

    fn apply(event: AuthEvent, store: &mut Store) {
        match event {
            AuthEvent::SignedIn(session) => store.sign_in(session),
            AuthEvent::TokenRefreshed(session) => store.refresh_session(session),
            AuthEvent::SignedOut => store.sign_out(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
