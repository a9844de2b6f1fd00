//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame aggregation of mapped input events.
//
// Two categories:
// - `discrete`: one-shot inputs (key/button transitions), order kept,
//   consecutive duplicates dropped
// - `continuous`: last-known-state inputs (cursor movement), coalesced so
//   only the newest event of each kind survives
//
// The buffer lives for one frame; the shell drains it into the event
// channel after each pump.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 8;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    /// Appends a discrete input; consecutive duplicates are dropped.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Inserts or replaces a continuous input.
    ///
    /// `InputEvent` equality ignores coordinates for cursor movement, so
    /// the newest position always replaces the previous one.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Returns all collected events and leaves the buffer empty.
    ///
    /// Discrete events keep their order; coalesced continuous events
    /// follow them.
    pub(crate) fn drain(&mut self) -> Vec<InputEvent> {
        let mut events = std::mem::take(&mut self.discrete);
        events.extend(self.continuous.drain());
        events
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
