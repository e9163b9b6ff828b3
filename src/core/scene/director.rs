//=========================================================================
// Scene Director
//=========================================================================
//
// Per-frame strategy dispatch.
//
// Each frame the director looks up the current scene's strategy, resolves
// its camera config from state, applies it to the one shared camera
// controller and renders. When the current scene differs from last
// frame's, the outgoing renderer's `on_exit` and the incoming renderer's
// `on_enter` run first.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{CameraController, Scene, SceneRegistry};
use crate::core::state::AppState;

//=== FrameOutcome ========================================================

/// What the director did for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The scene's strategy was resolved and rendered.
    Rendered(Scene),

    /// No strategy is registered for the current scene; nothing drawn.
    Empty(Scene),
}

//=== SceneDirector =======================================================

/// Owns the registry and the shared camera controller.
pub struct SceneDirector<C: CameraController> {
    registry: SceneRegistry,
    camera: C,
    active: Option<Scene>,
    frames: u64,
}

impl<C: CameraController> SceneDirector<C> {
    pub fn new(registry: SceneRegistry, camera: C) -> Self {
        Self {
            registry,
            camera,
            active: None,
            frames: 0,
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Resolves, configures and renders the current scene.
    pub fn frame(&mut self, state: &AppState) -> FrameOutcome {
        let scene = state.scene;
        self.frames += 1;

        if self.active != Some(scene) {
            self.switch_scene(scene, state);
        }

        let Some(entry) = self.registry.get_mut(scene) else {
            return FrameOutcome::Empty(scene);
        };

        let config = (entry.resolve_camera)(state);
        self.camera.apply(&config);
        entry.renderer.render(state, &mut self.camera);

        FrameOutcome::Rendered(scene)
    }

    //--- Accessors --------------------------------------------------------

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    /// Scene rendered by the most recent frame.
    pub fn active_scene(&self) -> Option<Scene> {
        self.active
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    //--- Internal Helpers -------------------------------------------------

    fn switch_scene(&mut self, next: Scene, state: &AppState) {
        if let Some(previous) = self.active {
            if let Some(entry) = self.registry.get_mut(previous) {
                entry.renderer.on_exit(state);
            }
        }

        debug!("Director switching scene {:?} -> {:?}", self.active, next);
        self.active = Some(next);

        if let Some(entry) = self.registry.get_mut(next) {
            entry.renderer.on_enter(state);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
