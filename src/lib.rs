//=========================================================================
// KPIA Core: Library Root
//
// This crate defines the orchestration core of the KPIA SYSTEM universe
// explorer: the application store, scene transitions, timed sequences,
// per-scene dispatch, keyboard shortcuts and profile persistence.
//
// Responsibilities:
// - Expose the runtime facade (`Kpia`, `KpiaBuilder`)
// - Expose `core` for hosts that wire subsystems themselves
// - Keep the Winit translation layer (`platform`) internal
//
// Typical usage:
// ```no_run
// use kpia_core::core::persistence::AnonymousAuth;
// use kpia_core::KpiaBuilder;
//
// let mut kpia = KpiaBuilder::new().build();
// kpia.start(&AnonymousAuth);
// let _report = kpia.frame();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains every subsystem (state, scene, input, persistence...).
// Most hosts only need the `Kpia` facade and the types in `prelude`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` converts Winit keyboard events; the runtime owns the only
// translator.
//
// `engine` defines the runtime facade and its builder.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{FrameReport, Kpia, KpiaBuilder, StopReport};
