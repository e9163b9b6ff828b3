//=========================================================================
// Application State
//=========================================================================
//
// The store, its data model and everything that mutates it.
//
// - `app_state`  plain data (`AppState` and its parts)
// - `catalog`    read-only galaxy catalog
// - `store`      owner of the state, atomic setters, timer pump
// - `transition` three-phase scene transitions
// - `sequences`  startup and dive timelines
// - `sync`       session and profile persistence actions
//
//=========================================================================

mod app_state;
mod catalog;
mod command;
mod events;
mod sequences;
mod store;
mod sync;
mod transition;

pub use app_state::{
    AppState, LastPosition, Menu, MenuVisibility, PersistedProgress, Selection, SequenceFlags,
    TransitionState, DEFAULT_KARDASHEV_SCALE,
};
pub use catalog::{Galaxy, GalaxyCatalog, GalaxyKind};
pub use command::Command;
pub use events::StoreEvent;
pub use sequences::{dive_timeline, startup_timeline, SequenceCue};
pub use store::{Store, StoreBuilder};
pub use sync::SaveOutcome;
pub use transition::{TransitionCallback, TransitionId, TransitionOptions, TransitionPhase};
