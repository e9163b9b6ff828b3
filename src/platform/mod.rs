//=========================================================================
// Platform Subsystem
//
// Bridges Winit keyboard events into the shortcut router.
//
// Architecture:
// ```text
//  Host Event Loop (owns the window)
//   ↓ WindowEvent
//  KeyboardTranslator
//   ├─ Converts Winit key codes
//   ├─ Tracks modifiers (sticky until ModifiersChanged)
//   └─ Stamps text-field focus reported by the host
//   ↓ KeyInput
//  Kpia::handle_key → ShortcutRouter → Store
// ```
//
// The host application runs the event loop and owns the window; this
// layer only translates what the host hands it.
//
//=========================================================================

//=== Submodules ==========================================================

mod keyboard;

//=== Public API ==========================================================

pub use keyboard::KeyboardTranslator;
