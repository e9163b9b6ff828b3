//=========================================================================
// Keyboard Translator
//=========================================================================
//
// Converts Winit keyboard events into `KeyInput` for the shortcut router.
//
// Architecture:
//   WindowEvent → KeyboardTranslator → KeyInput → ShortcutRouter
//
// Stateful: caches modifier state from ModifiersChanged events and the
// host's text-field focus flag, and applies both to every key press.
// Releases and unmapped keys (F13-F24, numpad, media keys) are filtered
// (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, KeyInput, Modifiers};

//=== KeyboardTranslator ==================================================

/// Converts Winit key events to `KeyInput` with sticky modifier tracking.
#[derive(Debug, Clone, Default)]
pub struct KeyboardTranslator {
    current_modifiers: Modifiers,
    text_input_focused: bool,
}

impl KeyboardTranslator {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- State Management -------------------------------------------------

    /// Updates cached modifier state (applied to subsequent presses).
    pub fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    /// Set by the host when a text input gains or loses focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    pub fn text_input_focused(&self) -> bool {
        self.text_input_focused
    }

    //--- Event Processing -------------------------------------------------

    /// Handles a window event, returning a key press if it produced one.
    ///
    /// Losing window focus drops the cached modifiers, since the release
    /// events will be delivered elsewhere.
    pub fn translate_window_event(&mut self, event: &WindowEvent) -> Option<KeyInput> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.update_modifiers(modifiers.state());
                None
            }
            WindowEvent::Focused(false) => {
                self.current_modifiers = Modifiers::NONE;
                None
            }
            WindowEvent::KeyboardInput { event, is_synthetic: false, .. } => {
                self.translate(event.physical_key, event.state, event.repeat)
            }
            _ => None,
        }
    }

    /// Converts one physical key transition (filters releases and unmapped keys).
    pub fn translate(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<KeyInput> {
        if state != ElementState::Pressed {
            return None;
        }

        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key, KeyCode::Unidentified) {
            return None;
        }

        Some(KeyInput {
            key,
            modifiers: self.current_modifiers,
            repeat,
            text_input_focused: self.text_input_focused,
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to router Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key() || state.super_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to router key codes.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Function -----------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Navigation ---------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,
            Home => KeyCode::Home,
            End => KeyCode::End,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
