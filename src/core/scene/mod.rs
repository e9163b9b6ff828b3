//=========================================================================
// Scene System
//=========================================================================
//
// Closed set of top-level scenes and the per-scene strategy dispatch.
//
// Architecture:
//   SceneDirector
//     ├─ registry: SceneRegistry   [Scene → (SceneRenderer, CameraResolver)]
//     └─ camera:   CameraController (one shared instance)
//
// Flow (every frame):
//   frame(&AppState) → registry lookup → resolve camera → apply → render
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::state::AppState;

//=== Module Declarations =================================================

mod camera;
mod director;
mod registry;
pub mod strategies;

//=== Public API ==========================================================

pub use camera::{CameraConfig, CameraController, CameraRig};
pub use director::{FrameOutcome, SceneDirector};
pub use registry::{CameraResolver, SceneEntry, SceneRegistry};

//=== Scene ===============================================================

/// Top-level application mode. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scene {
    /// Title screen shown at boot and after returning home.
    #[default]
    Start,

    /// Navigable field of galaxies.
    Universe,

    /// The personal "DNA helix" space.
    Personal,

    /// Skill tree.
    Skill,
}

impl Scene {
    pub const COUNT: usize = 4;

    pub const ALL: [Scene; Scene::COUNT] = [Scene::Start, Scene::Universe, Scene::Personal, Scene::Skill];

    /// Stable slot index used by the registry table.
    pub const fn index(self) -> usize {
        match self {
            Scene::Start => 0,
            Scene::Universe => 1,
            Scene::Personal => 2,
            Scene::Skill => 3,
        }
    }
}

//=== ViewMode ============================================================

/// Sub-mode of the universe scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Whole universe in view.
    #[default]
    Overview,

    /// Zoomed in on the selected galaxy.
    Detail,
}

//=== SceneRenderer Trait =================================================

/// Draws one scene. Implemented by the host's decorative renderers.
///
/// Only `render()` is required. Lifecycle hooks default to no-ops and are
/// called by the director when the current scene changes.
///
/// ```
/// use kpia_core::core::scene::{CameraController, SceneRenderer};
/// use kpia_core::core::state::AppState;
///
/// struct Starfield;
///
/// impl SceneRenderer for Starfield {
///     fn render(&mut self, _state: &AppState, _camera: &mut dyn CameraController) {}
/// }
/// ```
pub trait SceneRenderer: Send {
    /// Called when this scene becomes current.
    fn on_enter(&mut self, _state: &AppState) {}

    /// Called when another scene replaces this one.
    fn on_exit(&mut self, _state: &AppState) {}

    /// Called every frame while this scene is current, after the camera
    /// has been configured for the frame.
    fn render(&mut self, state: &AppState, camera: &mut dyn CameraController);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, scene) in Scene::ALL.iter().enumerate() {
            assert_eq!(scene.index(), i);
        }
    }

    #[test]
    fn defaults_are_start_and_overview() {
        assert_eq!(Scene::default(), Scene::Start);
        assert_eq!(ViewMode::default(), ViewMode::Overview);
    }

    #[test]
    fn serialize_as_upper_case_names() {
        assert_eq!(serde_json::to_value(Scene::Universe).unwrap(), "UNIVERSE");
        assert_eq!(serde_json::to_value(ViewMode::Detail).unwrap(), "DETAIL");
        let scene: Scene = serde_json::from_str("\"SKILL\"").unwrap();
        assert_eq!(scene, Scene::Skill);
    }
}
