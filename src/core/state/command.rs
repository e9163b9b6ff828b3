//=========================================================================
// Store Commands
//=========================================================================
//
// Closed set of store actions that input handlers may request.
//
// The shortcut router produces at most one `Command` per key press;
// `Store::dispatch` maps each onto the matching setter or transition
// action, which applies its own guards.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::app_state::Menu;
use crate::core::scene::ViewMode;

//=== Command =============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenMenu(Menu),
    ToggleMenu(Menu),
    CloseAllMenus,
    ToggleMute,

    SetViewMode(ViewMode),
    /// `None` clears the selection.
    SelectGalaxy(Option<String>),

    ToggleSceneMode,
    ReturnToStart,
    WarpToGalaxy { id: String, name: String },
    EnterUniverse,
    EnterSkillScene,

    /// Starts or skips the intro sequence.
    SetStartupActive(bool),
}
