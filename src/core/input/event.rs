//=========================================================================
// Key Input Types
//
// Platform-independent representation of a key press as seen by the
// shortcut router.
//
// Responsibilities:
// - Identify physical keys independent of layout
// - Carry modifier state for exact-match bindings
// - Carry the two bits of context the router guards on: whether the
//   press is an auto-repeat, and whether a text field has focus
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    KeyboardTranslator
//         ↓
//    KeyInput (this module)
//         ↓
//    ShortcutRouter → Command → Store
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    //--- Navigation Keys --------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    Home,
    End,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key the platform reported but this enum does not name.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Bindings match modifiers exactly: a binding for `F2` does not fire on
/// `Ctrl+F2`, which leaves browser/OS combinations alone.
///
/// Left and right variants are not distinguished; macOS Command maps to
/// `ctrl` and Option to `alt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

//--- Modifier Constants --------------------------------------------------

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
    pub const SHIFT_CTRL: Self = Self { shift: true, ctrl: true, alt: false };

    /// True if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== KeyInput ============================================================

/// A single key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: KeyCode,
    pub modifiers: Modifiers,

    /// Generated by the OS key-repeat rather than a fresh press.
    pub repeat: bool,

    /// A text input owns keyboard focus.
    pub text_input_focused: bool,
}

impl KeyInput {
    /// Fresh press with no modifiers and no text focus.
    pub fn press(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            repeat: false,
            text_input_focused: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn in_text_field(mut self) -> Self {
        self.text_input_focused = true;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn press_defaults() {
        let input = KeyInput::press(KeyCode::Escape);
        assert!(input.modifiers.is_empty());
        assert!(!input.repeat);
        assert!(!input.text_input_focused);
    }

    #[test]
    fn builders_compose() {
        let input = KeyInput::press(KeyCode::KeyS)
            .with_modifiers(Modifiers::CTRL)
            .repeated()
            .in_text_field();

        assert_eq!(input.modifiers, Modifiers::CTRL);
        assert!(input.repeat && input.text_input_focused);
    }

    #[test]
    fn modifiers_distinguish_bindings() {
        let mut set = HashSet::new();
        set.insert((KeyCode::F2, Modifiers::NONE));
        set.insert((KeyCode::F2, Modifiers::CTRL));
        set.insert((KeyCode::F2, Modifiers::NONE));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_modifiers_are_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert!(!Modifiers::SHIFT_CTRL.is_empty());
    }
}
