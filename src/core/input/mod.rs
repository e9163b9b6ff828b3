//=========================================================================
// Input System
//
// Keyboard shortcut handling for the application shell.
//
// Responsibilities:
// - Describe key presses independently of the windowing backend
// - Map keys to abstract shortcuts through a re-bindable table
// - Route shortcuts to at most one store `Command` per press, honoring
//   the guard layers (text focus, menus, scene, loading)
//
// Notes:
// Routing is a pure function of the key press and the current
// `AppState`. The runtime dispatches the resulting command itself.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod bindings;
pub mod event;
pub mod router;

//=== Public API ==========================================================
pub use bindings::{Shortcut, ShortcutBindings, ShortcutClass};
pub use event::{KeyCode, KeyInput, Modifiers};
pub use router::{Routed, ShortcutRouter};
