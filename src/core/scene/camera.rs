//=========================================================================
// Camera
//=========================================================================
//
// Camera constraint parameters and the shared controller they are
// applied to.
//
// A `CameraConfig` is sparse: `None` fields leave the controller's
// current value alone. The director applies one config per frame to the
// single controller instance, which is never re-created.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;

//=== CameraConfig ========================================================

/// Orbit-camera constraints resolved per frame from application state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraConfig {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    /// Damping time in seconds.
    pub smooth_time: Option<f32>,
    /// User orbit/zoom input accepted.
    pub enabled: Option<bool>,
    pub min_polar_angle: Option<f32>,
    pub max_polar_angle: Option<f32>,
    /// Controller becomes the renderer's default camera.
    pub make_default: Option<bool>,
}

impl CameraConfig {
    /// Config that changes nothing.
    pub const UNCHANGED: Self = Self {
        min_distance: None,
        max_distance: None,
        smooth_time: None,
        enabled: None,
        min_polar_angle: None,
        max_polar_angle: None,
        make_default: None,
    };
}

//=== CameraController Trait ==============================================

/// The host's camera-control instance.
pub trait CameraController {
    /// Applies every `Some` field of `config`.
    fn apply(&mut self, config: &CameraConfig);
}

impl<C: CameraController + ?Sized> CameraController for Box<C> {
    fn apply(&mut self, config: &CameraConfig) {
        (**self).apply(config)
    }
}

//=== CameraRig ===========================================================

/// Concrete controller state. Hosts can mirror it into their engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub smooth_time: f32,
    pub enabled: bool,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub is_default: bool,
    /// Number of configs applied so far.
    pub applied: u64,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            smooth_time: 0.25,
            enabled: true,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            is_default: false,
            applied: 0,
        }
    }
}

impl CameraController for CameraRig {
    fn apply(&mut self, config: &CameraConfig) {
        if let Some(v) = config.min_distance {
            self.min_distance = v;
        }
        if let Some(v) = config.max_distance {
            self.max_distance = v;
        }
        if let Some(v) = config.smooth_time {
            self.smooth_time = v;
        }
        if let Some(v) = config.enabled {
            self.enabled = v;
        }
        if let Some(v) = config.min_polar_angle {
            self.min_polar_angle = v;
        }
        if let Some(v) = config.max_polar_angle {
            self.max_polar_angle = v;
        }
        if let Some(v) = config.make_default {
            self.is_default = v;
        }
        self.applied += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
