//=========================================================================
// Shortcut Router
//=========================================================================
//
// Pure key-press → command mapping with layered guards.
//
// Evaluation order for one key press:
//
//   1. unbound key                      → Ignored
//   2. text field focused               → Escape blurs, everything else Ignored
//   3. auto-repeat                      → Ignored (except galaxy cycling in overview)
//   4. Escape cascade                   → first matching branch only
//   5. universal toggles                → always
//   6. scene-specific / navigation      → blocked on START, with a menu
//                                         open, or while loading
//
// At most one command comes out of a press, and only a press that
// produced something should have its default platform behavior
// suppressed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::bindings::{Shortcut, ShortcutBindings, ShortcutClass};
use super::event::KeyInput;
use crate::core::scene::{Scene, ViewMode};
use crate::core::state::{AppState, Command, GalaxyCatalog, Menu};

//=== Routed ==============================================================

/// Outcome of routing one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Nothing fires; let the platform handle the key.
    Ignored,

    /// Release text-field focus.
    Blur,

    Command(Command),
}

impl Routed {
    /// True if the platform's default handling should be suppressed.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Routed::Ignored)
    }

    pub fn command(&self) -> Option<&Command> {
        match self {
            Routed::Command(command) => Some(command),
            _ => None,
        }
    }
}

//=== ShortcutRouter ======================================================

#[derive(Debug, Clone, Default)]
pub struct ShortcutRouter {
    bindings: ShortcutBindings,
}

impl ShortcutRouter {
    pub fn new(bindings: ShortcutBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &ShortcutBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ShortcutBindings {
        &mut self.bindings
    }

    //--- route() ----------------------------------------------------------

    pub fn route(&self, input: &KeyInput, state: &AppState, catalog: &GalaxyCatalog) -> Routed {
        let Some(shortcut) = self.bindings.map_key(input.key, input.modifiers) else {
            return Routed::Ignored;
        };

        if input.text_input_focused {
            return match shortcut {
                Shortcut::Escape => Routed::Blur,
                _ => Routed::Ignored,
            };
        }

        let routed = match shortcut.class() {
            ShortcutClass::Escape => Self::escape_cascade(state),
            ShortcutClass::Universal => Self::universal(shortcut),
            ShortcutClass::SceneSpecific if Self::scene_locked(state) => Routed::Ignored,
            ShortcutClass::SceneSpecific => Self::scene_specific(shortcut),
            ShortcutClass::Navigation if Self::scene_locked(state) => Routed::Ignored,
            ShortcutClass::Navigation => Self::navigation(shortcut, state, catalog),
        };

        if input.repeat && !Self::repeatable(&routed) {
            return Routed::Ignored;
        }

        if routed != Routed::Ignored {
            debug!("{:?} routed to {:?}", input.key, routed);
        }
        routed
    }

    //--- Guard Layers -----------------------------------------------------

    fn escape_cascade(state: &AppState) -> Routed {
        let command = if state.menus.any_open() {
            Command::CloseAllMenus
        } else if state.view_mode == ViewMode::Detail {
            Command::SetViewMode(ViewMode::Overview)
        } else if state.selection.selected.is_some() {
            Command::SelectGalaxy(None)
        } else if state.scene != Scene::Start {
            Command::OpenMenu(Menu::Main)
        } else {
            return Routed::Ignored;
        };
        Routed::Command(command)
    }

    fn universal(shortcut: Shortcut) -> Routed {
        match shortcut {
            Shortcut::ToggleMainMenu => Routed::Command(Command::ToggleMenu(Menu::Main)),
            Shortcut::ToggleMute => Routed::Command(Command::ToggleMute),
            _ => Routed::Ignored,
        }
    }

    fn scene_locked(state: &AppState) -> bool {
        state.scene == Scene::Start || state.menus.any_open() || state.transition.is_busy()
    }

    fn scene_specific(shortcut: Shortcut) -> Routed {
        let command = match shortcut {
            Shortcut::ToggleMap => Command::ToggleMenu(Menu::Map),
            Shortcut::ToggleStatus => Command::ToggleMenu(Menu::Status),
            Shortcut::ToggleNotes => Command::ToggleMenu(Menu::Notes),
            Shortcut::ToggleSocial => Command::ToggleMenu(Menu::Social),
            Shortcut::ToggleSceneMode => Command::ToggleSceneMode,
            Shortcut::ReturnToStart => Command::ReturnToStart,
            _ => return Routed::Ignored,
        };
        Routed::Command(command)
    }

    //--- navigation() -----------------------------------------------------
    //
    // Galaxy navigation only exists in the universe.
    //
    // Enter: hovered with nothing selected selects the hovered galaxy;
    // otherwise a selection in overview opens its detail view.
    // Arrows: overview cycles the selection, detail warps to the neighbor.
    //
    fn navigation(shortcut: Shortcut, state: &AppState, catalog: &GalaxyCatalog) -> Routed {
        if state.scene != Scene::Universe {
            return Routed::Ignored;
        }
        let selected = state.selection.selected.as_deref();

        let command = match shortcut {
            Shortcut::Confirm => match (state.selection.hovered.as_deref(), selected) {
                (Some(hovered), None) => Command::SelectGalaxy(Some(hovered.to_owned())),
                (_, Some(_)) if state.view_mode == ViewMode::Overview => {
                    Command::SetViewMode(ViewMode::Detail)
                }
                _ => return Routed::Ignored,
            },
            Shortcut::NextGalaxy | Shortcut::PreviousGalaxy => {
                let neighbor = if shortcut == Shortcut::NextGalaxy {
                    catalog.next_after(selected)
                } else {
                    catalog.previous_before(selected)
                };
                let Some(galaxy) = neighbor else {
                    return Routed::Ignored;
                };
                match state.view_mode {
                    ViewMode::Overview => Command::SelectGalaxy(Some(galaxy.id.clone())),
                    ViewMode::Detail => Command::WarpToGalaxy {
                        id: galaxy.id.clone(),
                        name: galaxy.name.clone(),
                    },
                }
            }
            _ => return Routed::Ignored,
        };
        Routed::Command(command)
    }

    /// Held keys may only repeat selection cycling.
    fn repeatable(routed: &Routed) -> bool {
        matches!(routed, Routed::Command(Command::SelectGalaxy(Some(_))))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
