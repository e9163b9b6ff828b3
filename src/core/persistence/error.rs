//=========================================================================
// Persistence Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== PersistenceError ====================================================

/// Failures talking to the auth or profile backend.
///
/// These never escape the store: call sites log them and carry on with
/// the state they already had.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backend answered with an error.
    #[error("profile backend error: {0}")]
    Backend(String),

    /// The stored game state could not be encoded or decoded.
    #[error("game state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local profile storage could not be read or written.
    #[error("profile storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unreachable.
    #[error("profile backend is offline")]
    Offline,
}
