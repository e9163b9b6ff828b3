//=========================================================================
// Shortcut Bindings
//=========================================================================
//
// Re-bindable map from key presses to shortcuts.
//
// Architecture:
//   (key, modifiers) → HashMap → Shortcut → ShortcutClass (guard layer)
//
// The binding table is pure data; the router decides whether a bound
// shortcut may fire in the current state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, Modifiers};

//=== Shortcut ============================================================

/// Abstract keyboard shortcut, independent of which key triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Escape,

    ToggleMainMenu,
    ToggleMute,

    ToggleMap,
    ToggleStatus,
    ToggleNotes,
    ToggleSocial,
    ToggleSceneMode,
    ReturnToStart,

    Confirm,
    NextGalaxy,
    PreviousGalaxy,
}

//=== ShortcutClass =======================================================

/// Guard layer a shortcut belongs to, in router priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutClass {
    /// Priority cascade; also the only shortcut honored in text fields.
    Escape,

    /// Available whenever no text field has focus.
    Universal,

    /// Blocked on START, with a menu open, or during a transition.
    SceneSpecific,

    /// Same guards as scene-specific, plus state-dependent behavior.
    Navigation,
}

impl Shortcut {
    pub fn class(self) -> ShortcutClass {
        match self {
            Shortcut::Escape => ShortcutClass::Escape,
            Shortcut::ToggleMainMenu | Shortcut::ToggleMute => ShortcutClass::Universal,
            Shortcut::ToggleMap
            | Shortcut::ToggleStatus
            | Shortcut::ToggleNotes
            | Shortcut::ToggleSocial
            | Shortcut::ToggleSceneMode
            | Shortcut::ReturnToStart => ShortcutClass::SceneSpecific,
            Shortcut::Confirm | Shortcut::NextGalaxy | Shortcut::PreviousGalaxy => {
                ShortcutClass::Navigation
            }
        }
    }
}

//=== ShortcutBindings ====================================================

/// Key bindings, matched on exact modifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBindings {
    keys: HashMap<(KeyCode, Modifiers), Shortcut>,
}

impl ShortcutBindings {
    /// Creates a table with no bindings.
    pub fn empty() -> Self {
        Self { keys: HashMap::new() }
    }

    /// The stock layout.
    ///
    /// ```text
    /// Escape        Escape cascade      F1  main menu
    /// F2 map        F3 status           F4  notes
    /// F5 social     F6 scene mode       M   mute
    /// Home          return to start     Enter confirm
    /// ← / A         previous galaxy     → / D next galaxy
    /// ```
    pub fn defaults() -> Self {
        let mut bindings = Self::empty();
        bindings.bind_key(KeyCode::Escape, Shortcut::Escape);
        bindings.bind_key(KeyCode::F1, Shortcut::ToggleMainMenu);
        bindings.bind_key(KeyCode::F2, Shortcut::ToggleMap);
        bindings.bind_key(KeyCode::F3, Shortcut::ToggleStatus);
        bindings.bind_key(KeyCode::F4, Shortcut::ToggleNotes);
        bindings.bind_key(KeyCode::F5, Shortcut::ToggleSocial);
        bindings.bind_key(KeyCode::F6, Shortcut::ToggleSceneMode);
        bindings.bind_key(KeyCode::KeyM, Shortcut::ToggleMute);
        bindings.bind_key(KeyCode::Home, Shortcut::ReturnToStart);
        bindings.bind_key(KeyCode::Enter, Shortcut::Confirm);
        bindings.bind_key(KeyCode::ArrowLeft, Shortcut::PreviousGalaxy);
        bindings.bind_key(KeyCode::KeyA, Shortcut::PreviousGalaxy);
        bindings.bind_key(KeyCode::ArrowRight, Shortcut::NextGalaxy);
        bindings.bind_key(KeyCode::KeyD, Shortcut::NextGalaxy);
        bindings
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key (no modifiers). Replaces any existing binding.
    pub fn bind_key(&mut self, key: KeyCode, shortcut: Shortcut) {
        self.bind_key_with_mods(key, Modifiers::NONE, shortcut);
    }

    /// Binds a key with modifiers (exact match required).
    pub fn bind_key_with_mods(&mut self, key: KeyCode, modifiers: Modifiers, shortcut: Shortcut) {
        self.keys.insert((key, modifiers), shortcut);
    }

    /// Removes the unmodified binding for `key` only.
    pub fn unbind_key(&mut self, key: KeyCode) {
        self.keys.remove(&(key, Modifiers::NONE));
    }

    /// Removes every modifier variant bound to `key`.
    pub fn unbind_key_all_variants(&mut self, key: KeyCode) {
        self.keys.retain(|&(k, _), _| k != key);
    }

    /// Removes every key bound to `shortcut`.
    pub fn unbind_shortcut(&mut self, shortcut: Shortcut) {
        self.keys.retain(|_, s| *s != shortcut);
    }

    /// Moves `shortcut` onto a single new key.
    pub fn rebind(&mut self, shortcut: Shortcut, key: KeyCode, modifiers: Modifiers) {
        self.unbind_shortcut(shortcut);
        self.bind_key_with_mods(key, modifiers, shortcut);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    //--- Lookup -----------------------------------------------------------

    pub fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<Shortcut> {
        self.keys.get(&(key, modifiers)).copied()
    }

    /// Keys bound to `shortcut`, in no particular order.
    pub fn keys_for(&self, shortcut: Shortcut) -> Vec<(KeyCode, Modifiers)> {
        self.keys
            .iter()
            .filter(|(_, s)| **s == shortcut)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ShortcutBindings {
    fn default() -> Self {
        Self::defaults()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Defaults
    //=====================================================================

    #[test]
    fn defaults_cover_documented_keys() {
        let bindings = ShortcutBindings::defaults();

        assert_eq!(bindings.map_key(KeyCode::Escape, Modifiers::NONE), Some(Shortcut::Escape));
        assert_eq!(bindings.map_key(KeyCode::F6, Modifiers::NONE), Some(Shortcut::ToggleSceneMode));
        assert_eq!(bindings.map_key(KeyCode::Home, Modifiers::NONE), Some(Shortcut::ReturnToStart));
        assert_eq!(bindings.map_key(KeyCode::KeyA, Modifiers::NONE), Some(Shortcut::PreviousGalaxy));
        assert_eq!(bindings.map_key(KeyCode::KeyD, Modifiers::NONE), Some(Shortcut::NextGalaxy));
        assert_eq!(bindings.len(), 14);
    }

    #[test]
    fn classes_follow_guard_layers() {
        assert_eq!(Shortcut::Escape.class(), ShortcutClass::Escape);
        assert_eq!(Shortcut::ToggleMute.class(), ShortcutClass::Universal);
        assert_eq!(Shortcut::ToggleMap.class(), ShortcutClass::SceneSpecific);
        assert_eq!(Shortcut::Confirm.class(), ShortcutClass::Navigation);
    }

    //=====================================================================
    // Modifiers
    //=====================================================================

    #[test]
    fn modifiers_must_match_exactly() {
        let bindings = ShortcutBindings::defaults();
        assert_eq!(bindings.map_key(KeyCode::F2, Modifiers::CTRL), None);
        assert_eq!(bindings.map_key(KeyCode::KeyM, Modifiers::SHIFT), None);
    }

    #[test]
    fn modified_variants_are_independent() {
        let mut bindings = ShortcutBindings::empty();
        bindings.bind_key(KeyCode::KeyN, Shortcut::ToggleNotes);
        bindings.bind_key_with_mods(KeyCode::KeyN, Modifiers::SHIFT, Shortcut::ToggleSocial);

        bindings.unbind_key(KeyCode::KeyN);

        assert_eq!(bindings.map_key(KeyCode::KeyN, Modifiers::NONE), None);
        assert_eq!(bindings.map_key(KeyCode::KeyN, Modifiers::SHIFT), Some(Shortcut::ToggleSocial));

        bindings.unbind_key_all_variants(KeyCode::KeyN);
        assert!(bindings.is_empty());
    }

    //=====================================================================
    // Rebinding
    //=====================================================================

    #[test]
    fn rebind_moves_every_key() {
        let mut bindings = ShortcutBindings::defaults();
        bindings.rebind(Shortcut::NextGalaxy, KeyCode::KeyL, Modifiers::NONE);

        assert_eq!(bindings.map_key(KeyCode::ArrowRight, Modifiers::NONE), None);
        assert_eq!(bindings.map_key(KeyCode::KeyD, Modifiers::NONE), None);
        assert_eq!(bindings.keys_for(Shortcut::NextGalaxy), vec![(KeyCode::KeyL, Modifiers::NONE)]);
    }

    #[test]
    fn binding_same_key_replaces() {
        let mut bindings = ShortcutBindings::empty();
        bindings.bind_key(KeyCode::F1, Shortcut::ToggleMap);
        bindings.bind_key(KeyCode::F1, Shortcut::ToggleMainMenu);
        assert_eq!(bindings.map_key(KeyCode::F1, Modifiers::NONE), Some(Shortcut::ToggleMainMenu));
    }

    #[test]
    fn clear_removes_everything() {
        let mut bindings = ShortcutBindings::defaults();
        bindings.clear();
        assert!(bindings.is_empty());
        assert_eq!(bindings.map_key(KeyCode::Escape, Modifiers::NONE), None);
    }
}
