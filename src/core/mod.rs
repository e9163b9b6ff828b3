//=========================================================================
// Core Systems
//
// Every subsystem of the orchestration core, independent of the host's
// window and render loop.
//
// Responsibilities:
// - `config`       runtime configuration and its validation
// - `timing`       injectable clock, timer queue, timelines
// - `state`        the application store and everything that mutates it
// - `scene`        per-scene renderer/camera dispatch
// - `input`        keyboard shortcut bindings and routing
// - `persistence`  auth session bridge, profile storage, auto-save
//
// Notes:
// All of it is single-threaded and driven by the runtime's `frame()`.
// Only the auth channel and the profile store cross thread boundaries.
//
//=========================================================================

pub mod config;
pub mod input;
pub mod persistence;
pub mod scene;
pub mod state;
pub mod timing;
