//=========================================================================
// Scene Registry
//=========================================================================
//
// Fixed table of per-scene strategies.
//
// Each slot pairs a renderer with a pure camera resolver. The table has
// one slot per `Scene` variant and is indexed directly, so lookups never
// hash and an unregistered scene is simply an empty slot.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::strategies::default_resolver;
use super::{CameraConfig, Scene, SceneRenderer};
use crate::core::state::AppState;

//=== CameraResolver ======================================================

/// Pure function from state to camera constraints.
pub type CameraResolver = fn(&AppState) -> CameraConfig;

//=== SceneEntry ==========================================================

/// A registered strategy: how to draw a scene and how to frame it.
pub struct SceneEntry {
    pub scene: Scene,
    pub renderer: Box<dyn SceneRenderer>,
    pub resolve_camera: CameraResolver,
}

impl std::fmt::Debug for SceneEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEntry").field("scene", &self.scene).finish_non_exhaustive()
    }
}

//=== SceneRegistry =======================================================

/// One optional strategy per scene.
#[derive(Debug)]
pub struct SceneRegistry {
    entries: [Option<SceneEntry>; Scene::COUNT],
}

impl SceneRegistry {
    //--- Construction -----------------------------------------------------

    /// Creates a registry with every slot empty.
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a renderer with an explicit camera resolver.
    ///
    /// Replaces (and warns about) any previous registration for `scene`.
    pub fn register<R>(&mut self, scene: Scene, renderer: R, resolve_camera: CameraResolver)
    where
        R: SceneRenderer + 'static,
    {
        let slot = &mut self.entries[scene.index()];
        if slot.is_some() {
            warn!("Scene {:?} was already registered and has been replaced", scene);
        } else {
            debug!("Registered strategy for scene {:?}", scene);
        }
        *slot = Some(SceneEntry {
            scene,
            renderer: Box::new(renderer),
            resolve_camera,
        });
    }

    /// Registers a renderer using the built-in camera resolver for `scene`.
    pub fn register_renderer<R>(&mut self, scene: Scene, renderer: R)
    where
        R: SceneRenderer + 'static,
    {
        self.register(scene, renderer, default_resolver(scene));
    }

    /// Removes a scene's strategy, returning it if present.
    pub fn unregister(&mut self, scene: Scene) -> Option<SceneEntry> {
        self.entries[scene.index()].take()
    }

    //--- Lookup -----------------------------------------------------------

    pub fn get(&self, scene: Scene) -> Option<&SceneEntry> {
        self.entries[scene.index()].as_ref()
    }

    pub fn get_mut(&mut self, scene: Scene) -> Option<&mut SceneEntry> {
        self.entries[scene.index()].as_mut()
    }

    pub fn contains(&self, scene: Scene) -> bool {
        self.get(scene).is_some()
    }

    /// Scenes with a registered strategy, in declaration order.
    pub fn registered(&self) -> Vec<Scene> {
        self.entries.iter().flatten().map(|e| e.scene).collect()
    }

    /// Resolves camera constraints for the current scene, if registered.
    pub fn resolve_camera(&self, state: &AppState) -> Option<CameraConfig> {
        self.get(state.scene).map(|entry| (entry.resolve_camera)(state))
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::CameraController;

    struct NullRenderer;

    impl SceneRenderer for NullRenderer {
        fn render(&mut self, _state: &AppState, _camera: &mut dyn CameraController) {}
    }

    fn fixed_camera(_state: &AppState) -> CameraConfig {
        CameraConfig { max_distance: Some(7.0), ..CameraConfig::UNCHANGED }
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = SceneRegistry::new();
        assert!(registry.registered().is_empty());
        assert!(registry.resolve_camera(&AppState::default()).is_none());
    }

    #[test]
    fn register_fills_only_its_slot() {
        let mut registry = SceneRegistry::new();
        registry.register_renderer(Scene::Universe, NullRenderer);

        assert!(registry.contains(Scene::Universe));
        assert!(!registry.contains(Scene::Start));
        assert_eq!(registry.registered(), vec![Scene::Universe]);
    }

    #[test]
    fn explicit_resolver_is_used() {
        let mut registry = SceneRegistry::new();
        registry.register(Scene::Start, NullRenderer, fixed_camera);

        let config = registry.resolve_camera(&AppState::default()).expect("start registered");
        assert_eq!(config.max_distance, Some(7.0));
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = SceneRegistry::new();
        registry.register_renderer(Scene::Start, NullRenderer);
        registry.register(Scene::Start, NullRenderer, fixed_camera);

        let entry = registry.get(Scene::Start).expect("registered");
        assert_eq!((entry.resolve_camera)(&AppState::default()).max_distance, Some(7.0));
        assert_eq!(registry.registered().len(), 1);
    }

    #[test]
    fn unregister_empties_slot() {
        let mut registry = SceneRegistry::new();
        registry.register_renderer(Scene::Skill, NullRenderer);

        let entry = registry.unregister(Scene::Skill).expect("was registered");
        assert_eq!(entry.scene, Scene::Skill);
        assert!(!registry.contains(Scene::Skill));
        assert!(registry.unregister(Scene::Skill).is_none());
    }
}
