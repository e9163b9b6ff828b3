//=========================================================================
// Scene Strategies
//=========================================================================
//
// Built-in camera resolvers, one per scene.
//
// Each resolver is a pure function of application state. The universe
// tightens its distance bounds when a galaxy is in detail view, and every
// scene disables user camera input while the dive sequence owns the
// camera.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;

//=== Internal Dependencies ===============================================

use super::{CameraConfig, Scene, ViewMode};
use crate::core::state::AppState;

//--- start_camera() ------------------------------------------------------

/// Title screen: camera is scripted, user input is off.
pub fn start_camera(_state: &AppState) -> CameraConfig {
    CameraConfig {
        enabled: Some(false),
        smooth_time: Some(1.2),
        make_default: Some(true),
        ..CameraConfig::UNCHANGED
    }
}

//--- universe_camera() ---------------------------------------------------

pub fn universe_camera(state: &AppState) -> CameraConfig {
    let enabled = !state.sequence.diving;
    match state.view_mode {
        ViewMode::Overview => CameraConfig {
            min_distance: Some(50.0),
            max_distance: Some(400.0),
            smooth_time: Some(1.0),
            enabled: Some(enabled),
            min_polar_angle: Some(0.0),
            max_polar_angle: Some(PI),
            make_default: Some(true),
        },
        ViewMode::Detail => CameraConfig {
            min_distance: Some(5.0),
            max_distance: Some(60.0),
            smooth_time: Some(0.6),
            enabled: Some(enabled),
            min_polar_angle: Some(0.0),
            max_polar_angle: Some(PI),
            make_default: Some(true),
        },
    }
}

//--- personal_camera() ---------------------------------------------------

/// Helix space: keep the camera out of the poles.
pub fn personal_camera(state: &AppState) -> CameraConfig {
    CameraConfig {
        min_distance: Some(10.0),
        max_distance: Some(120.0),
        smooth_time: Some(0.8),
        enabled: Some(!state.sequence.diving),
        min_polar_angle: Some(PI * 0.2),
        max_polar_angle: Some(PI * 0.8),
        make_default: Some(true),
    }
}

//--- skill_camera() ------------------------------------------------------

pub fn skill_camera(state: &AppState) -> CameraConfig {
    CameraConfig {
        min_distance: Some(20.0),
        max_distance: Some(200.0),
        smooth_time: Some(0.8),
        enabled: Some(!state.sequence.diving),
        min_polar_angle: Some(PI * 0.25),
        max_polar_angle: Some(PI * 0.75),
        make_default: Some(true),
    }
}

//--- default_resolver() --------------------------------------------------

/// Built-in resolver for `scene`.
pub fn default_resolver(scene: Scene) -> fn(&AppState) -> CameraConfig {
    match scene {
        Scene::Start => start_camera,
        Scene::Universe => universe_camera,
        Scene::Personal => personal_camera,
        Scene::Skill => skill_camera,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
