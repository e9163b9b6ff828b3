//=========================================================================
// Application State
//=========================================================================
//
// Plain data snapshot of everything the store owns.
//
// Consumers (scene renderers, HUD, shortcut router) only ever see
// `&AppState`; all mutation goes through `Store`.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::persistence::Session;
use crate::core::scene::{Scene, ViewMode};

/// Kardashev scale for fresh or reset progress.
pub const DEFAULT_KARDASHEV_SCALE: f64 = 1.24;

//=== Menu ================================================================

/// Menus and modals that can be toggled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Menu {
    Main,
    Map,
    Status,
    Notes,
    Social,
    Auth,
}

impl Menu {
    pub const ALL: [Menu; 6] = [
        Menu::Main,
        Menu::Map,
        Menu::Status,
        Menu::Notes,
        Menu::Social,
        Menu::Auth,
    ];
}

//=== MenuVisibility ======================================================

/// One visibility flag per menu. Any combination may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuVisibility {
    pub main: bool,
    pub map: bool,
    pub status: bool,
    pub notes: bool,
    pub social: bool,
    pub auth: bool,
}

impl MenuVisibility {
    pub fn is_open(&self, menu: Menu) -> bool {
        match menu {
            Menu::Main => self.main,
            Menu::Map => self.map,
            Menu::Status => self.status,
            Menu::Notes => self.notes,
            Menu::Social => self.social,
            Menu::Auth => self.auth,
        }
    }

    /// Sets a flag. Returns `true` if the value changed.
    pub fn set(&mut self, menu: Menu, open: bool) -> bool {
        let flag = match menu {
            Menu::Main => &mut self.main,
            Menu::Map => &mut self.map,
            Menu::Status => &mut self.status,
            Menu::Notes => &mut self.notes,
            Menu::Social => &mut self.social,
            Menu::Auth => &mut self.auth,
        };
        let changed = *flag != open;
        *flag = open;
        changed
    }

    pub fn any_open(&self) -> bool {
        Menu::ALL.iter().any(|&m| self.is_open(m))
    }

    /// Menus currently open, in declaration order.
    pub fn open_menus(&self) -> Vec<Menu> {
        Menu::ALL.iter().copied().filter(|&m| self.is_open(m)).collect()
    }
}

//=== Selection ===========================================================

/// Hovered and selected galaxy ids.
///
/// Ids are not validated against the catalog; lookups of unknown ids
/// simply find nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub hovered: Option<String>,
    pub selected: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.hovered.is_none() && self.selected.is_none()
    }
}

//=== TransitionState =====================================================

/// Loading overlay and input-lock flags driven by scene transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub is_loading: bool,
    pub loading_text: String,
}

impl TransitionState {
    /// True while either flag is raised.
    pub fn is_busy(&self) -> bool {
        self.is_transitioning || self.is_loading
    }
}

//=== SequenceFlags =======================================================

/// Flags toggled by the startup and dive timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceFlags {
    /// Startup timeline is running (intro not skipped or finished).
    pub startup_active: bool,
    pub zooming: bool,
    pub startup_text_visible: bool,
    pub tip_visible: bool,
    pub diving: bool,
    pub awakening: bool,
    /// Set once the first dive into the universe has played.
    pub initial_dive_done: bool,
}

//=== LastPosition ========================================================

/// Where the user last was, restored on their next session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPosition {
    pub scene: Scene,
    pub galaxy_id: Option<String>,
    pub view_mode: ViewMode,
}

//=== PersistedProgress ===================================================

/// User-owned progress synced with the profile store.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedProgress {
    /// Nominally within `[0, 1]`; not clamped on write.
    pub erosion_level: f64,
    pub kardashev_scale: f64,
    pub last_position: Option<LastPosition>,
    pub display_id: Option<String>,
}

impl PersistedProgress {
    /// Fresh progress with the given starting Kardashev scale.
    pub fn new(kardashev_scale: f64) -> Self {
        Self {
            erosion_level: 0.0,
            kardashev_scale,
            last_position: None,
            display_id: None,
        }
    }
}

impl Default for PersistedProgress {
    fn default() -> Self {
        Self::new(DEFAULT_KARDASHEV_SCALE)
    }
}

//=== AppState ============================================================

/// Complete orchestration state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub scene: Scene,
    pub view_mode: ViewMode,
    pub selection: Selection,
    pub transition: TransitionState,
    pub menus: MenuVisibility,
    pub muted: bool,
    /// Scene-local alternate presentation (cleared by every scene swap).
    pub alternate_mode: bool,
    pub sequence: SequenceFlags,
    pub progress: PersistedProgress,
    pub session: Option<Session>,
}

impl AppState {
    /// Initial state with the given default Kardashev scale.
    pub fn new(kardashev_scale: f64) -> Self {
        Self {
            scene: Scene::Start,
            view_mode: ViewMode::Overview,
            selection: Selection::default(),
            transition: TransitionState::default(),
            menus: MenuVisibility::default(),
            muted: false,
            alternate_mode: false,
            sequence: SequenceFlags::default(),
            progress: PersistedProgress::new(kardashev_scale),
            session: None,
        }
    }

    /// Current position, or `None` on the start screen.
    pub fn position(&self) -> Option<LastPosition> {
        if self.scene == Scene::Start {
            return None;
        }
        Some(LastPosition {
            scene: self.scene,
            galaxy_id: self.selection.selected.clone(),
            view_mode: self.view_mode,
        })
    }

    /// True if a signed-in user is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_KARDASHEV_SCALE)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
