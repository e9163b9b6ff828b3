//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use kpia_core::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::engine::{FrameReport, Kpia, KpiaBuilder, StopReport};

// Configuration
pub use crate::core::config::{KpiaConfig, TransitionPolicy};

// State
pub use crate::core::state::{AppState, Command, Menu, Store, StoreEvent, TransitionOptions};

// Scene system
pub use crate::core::scene::{CameraConfig, CameraController, Scene, SceneRenderer, ViewMode};

// Input
pub use crate::core::input::{KeyCode, KeyInput, Modifiers, Routed, Shortcut};

// Persistence
pub use crate::core::persistence::{AnonymousAuth, AuthEvent, AuthProvider, ProfileStore, Session};
