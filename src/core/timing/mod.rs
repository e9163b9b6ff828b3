//=========================================================================
// Timing
//=========================================================================
//
// Clock, delayed-work queue and declarative timelines.
//
// Architecture:
//   Clock ──now()──> Store
//                     ├─ TimerQueue<Task>   (transition phases, cues)
//                     └─ Timeline<Cue>      (startup / dive sequences)
//
//=========================================================================

//=== Module Declarations =================================================

mod clock;
mod sequencer;
mod timer_queue;

//=== Public API ==========================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use sequencer::{fraction_of, Cue, SequenceHandle, Timeline};
pub use timer_queue::{TimerGroup, TimerId, TimerQueue};
