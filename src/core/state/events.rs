//=========================================================================
// Store Events
//=========================================================================
//
// Notifications published by the store after each mutation.
//
// The store appends to an outbox; the runtime drains it once per frame
// and hands the batch to consumers (auto-save, HUD, audio). Events are
// informational only: the store state is already updated when they are
// read.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::app_state::Menu;
use super::sequences::SequenceCue;
use super::transition::TransitionId;
use crate::core::scene::{Scene, ViewMode};

//=== StoreEvent ==========================================================

/// Something observable changed in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    SceneChanged { from: Scene, to: Scene },
    ViewModeChanged(ViewMode),
    HoverChanged(Option<String>),
    SelectionChanged(Option<String>),
    MenuToggled { menu: Menu, open: bool },
    MuteChanged(bool),

    TransitionStarted { id: TransitionId, target: Scene },
    TransitionMidpoint { id: TransitionId, scene: Scene },
    TransitionCompleted { id: TransitionId },
    /// A transition was cancelled before finishing (superseded or reset).
    TransitionCancelled { id: TransitionId },

    CueFired(SequenceCue),

    /// A persisted progress field changed and should eventually be saved.
    ProgressChanged,
    ProgressSaved,
    ProfileLoaded,

    SessionChanged { signed_in: bool },
    StateReset,
}

impl StoreEvent {
    /// True for events that make persisted progress dirty.
    pub fn dirties_progress(&self) -> bool {
        matches!(self, StoreEvent::ProgressChanged)
    }
}
