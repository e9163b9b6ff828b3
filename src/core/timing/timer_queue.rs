//=========================================================================
// Timer Queue
//=========================================================================
//
// Deadline-ordered queue of delayed work.
//
// Actions schedule payloads here with an absolute deadline. The owner
// pops due payloads at tick boundaries and applies them. Entries can be
// cancelled individually (by id) or as a group.
//
// Ordering: (deadline, insertion order). Two payloads with the same
// deadline fire in the order they were scheduled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

//=== Identifiers =========================================================

/// Handle to a single scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Handle to a set of entries cancelled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerGroup(u64);

//=== Entry ===============================================================

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    group: Option<TimerGroup>,
    payload: T,
}

//=== TimerQueue ==========================================================

/// Queue of payloads keyed by absolute deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    pending: BTreeMap<(Duration, u64), Entry<T>>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
    next_group: u64,
}

impl<T> TimerQueue<T> {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
            next_group: 0,
        }
    }

    //--- Scheduling -------------------------------------------------------

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: T) -> TimerId {
        self.insert(deadline, None, payload)
    }

    /// Schedules `payload` as a member of `group`.
    pub fn schedule_in_group(&mut self, group: TimerGroup, deadline: Duration, payload: T) -> TimerId {
        self.insert(deadline, Some(group), payload)
    }

    /// Allocates a fresh group handle.
    pub fn new_group(&mut self) -> TimerGroup {
        let group = TimerGroup(self.next_group);
        self.next_group += 1;
        group
    }

    //--- Cancellation -----------------------------------------------------

    /// Cancels a single entry. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id.0)).map(|entry| entry.payload)
    }

    /// Cancels every pending entry in `group`. Returns how many were removed.
    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let before = self.pending.len();
        let deadlines = &mut self.deadlines;
        self.pending.retain(|_, entry| {
            let keep = entry.group != Some(group);
            if !keep {
                deadlines.remove(&entry.id);
            }
            keep
        });
        before - self.pending.len()
    }

    /// Returns `true` if the entry is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of pending entries belonging to `group`.
    pub fn group_len(&self, group: TimerGroup) -> usize {
        self.pending.values().filter(|e| e.group == Some(group)).count()
    }

    //--- Firing -----------------------------------------------------------

    /// Deadline of the earliest pending entry.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Removes and returns the earliest entry whose deadline is `<= now`.
    ///
    /// Popping one entry at a time lets the caller schedule follow-up work
    /// from a payload and still see it fire within the same tick.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, T)> {
        let &(deadline, seq) = self.pending.keys().next()?;
        if deadline > now {
            return None;
        }
        let entry = self.pending.remove(&(deadline, seq))?;
        self.deadlines.remove(&entry.id);
        Some((entry.id, entry.payload))
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending entry.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert(&mut self, deadline: Duration, group: Option<TimerGroup>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.deadlines.insert(id, deadline);
        self.pending.insert((deadline, id.0), Entry { id, group, payload });
        id
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
