//=========================================================================
// Sequencer
//=========================================================================
//
// Declarative timelines executed on a `TimerQueue`.
//
// Architecture:
//   Timeline<C> (data: delay + cue) ──start(now)──> TimerQueue group
//                                                     │
//   SequenceHandle ──dispose()──> cancel_group() ─────┘
//
// A timeline is pure data and can be built from absolute delays or from
// ratios of a total duration. Starting it records the trigger instant and
// schedules every cue relative to it; the returned handle cancels every
// cue that has not fired yet. There is no pause/resume: a restart is a
// dispose followed by a fresh start.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use super::timer_queue::{TimerGroup, TimerQueue};

//=== fraction_of() =======================================================

/// Returns `ratio` of `total`, rounded to whole milliseconds.
///
/// Float ratios such as `0.8` are not exact; rounding keeps
/// `fraction_of(2s, 0.8)` at exactly 1600ms.
pub fn fraction_of(total: Duration, ratio: f32) -> Duration {
    let millis = total.as_millis() as f64 * f64::from(ratio);
    Duration::from_millis(millis.round().max(0.0) as u64)
}

//=== Cue =================================================================

/// A single timeline entry: fire `event` at `delay` after the trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue<C> {
    pub delay: Duration,
    pub event: C,
}

//=== Timeline ============================================================

/// Ordered list of cues relative to one trigger instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<C> {
    cues: Vec<Cue<C>>,
}

impl<C: Clone> Timeline<C> {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self { cues: Vec::new() }
    }

    /// Adds a cue at an absolute delay from the trigger.
    pub fn at(mut self, delay: Duration, event: C) -> Self {
        self.cues.push(Cue { delay, event });
        self
    }

    /// Adds a cue at `ratio` of `total`.
    ///
    /// # Panics
    ///
    /// Panics if `ratio` is outside `[0, 1]`.
    pub fn at_ratio(self, total: Duration, ratio: f32, event: C) -> Self {
        assert!(
            (0.0..=1.0).contains(&ratio),
            "Timeline ratio must be within [0, 1], got {}",
            ratio
        );
        self.at(fraction_of(total, ratio), event)
    }

    /// Returns the cues in insertion order.
    pub fn cues(&self) -> &[Cue<C>] {
        &self.cues
    }

    /// Delay of the last cue (zero for an empty timeline).
    pub fn span(&self) -> Duration {
        self.cues.iter().map(|c| c.delay).max().unwrap_or(Duration::ZERO)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    //--- Execution --------------------------------------------------------

    /// Schedules every cue relative to `trigger` and returns the disposer.
    ///
    /// `wrap` converts a cue into the queue's payload type.
    pub fn start<T, F>(&self, trigger: Duration, queue: &mut TimerQueue<T>, wrap: F) -> SequenceHandle
    where
        F: Fn(C) -> T,
    {
        let group = queue.new_group();
        for cue in &self.cues {
            queue.schedule_in_group(group, trigger + cue.delay, wrap(cue.event.clone()));
        }
        debug!("Sequence started at {:?} with {} cues", trigger, self.cues.len());
        SequenceHandle { group, trigger }
    }
}

impl<C: Clone> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

//=== SequenceHandle ======================================================

/// Disposer for a started timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHandle {
    group: TimerGroup,
    trigger: Duration,
}

impl SequenceHandle {
    /// Instant the timeline was started at.
    pub fn trigger(&self) -> Duration {
        self.trigger
    }

    /// Number of cues still waiting to fire.
    pub fn remaining<T>(&self, queue: &TimerQueue<T>) -> usize {
        queue.group_len(self.group)
    }

    /// Cancels every cue that has not fired yet. Returns how many were cancelled.
    pub fn dispose<T>(self, queue: &mut TimerQueue<T>) -> usize {
        let cancelled = queue.cancel_group(self.group);
        debug!("Sequence from {:?} disposed ({} cues cancelled)", self.trigger, cancelled);
        cancelled
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
