//! Host-driven timeline of cancelable, timed cues.
//!
//! Time only moves when the owner calls [`Timeline::pop_due`] with a later
//! instant. Cues are tagged with the [`ChoreographyHandle`] of the chain that
//! scheduled them, so cancelling a chain removes exactly its own cues.

mod intro;
mod reveal;

use std::time::Duration;

pub use intro::{IntroChoreographer, IntroPhase, IntroView};
pub use reveal::{RevealCue, RevealFlags, RevealPlan, RevealTimer};

/// Which choreography a cue belongs to. Each slot has at most one live chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Reveal,
    Intro,
}

/// Identifies one started chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoreographyHandle {
    slot: Slot,
    generation: u64,
}

impl ChoreographyHandle {
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A state change scheduled for later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Reveal(RevealCue),
    Intro(IntroPhase),
}

/// Issues handles for one slot; starting a new chain retires the previous one.
#[derive(Debug)]
struct Generations {
    slot: Slot,
    generation: u64,
    active: Option<ChoreographyHandle>,
}

impl Generations {
    fn new(slot: Slot) -> Self {
        Self {
            slot,
            generation: 0,
            active: None,
        }
    }

    fn begin(&mut self, timeline: &mut Timeline) -> ChoreographyHandle {
        self.end(timeline);
        self.generation += 1;
        let handle = ChoreographyHandle {
            slot: self.slot,
            generation: self.generation,
        };
        self.active = Some(handle);
        handle
    }

    fn end(&mut self, timeline: &mut Timeline) -> Option<ChoreographyHandle> {
        let handle = self.active.take()?;
        timeline.cancel(handle);
        Some(handle)
    }

    fn is_current(&self, handle: ChoreographyHandle) -> bool {
        self.active == Some(handle)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    seq: u64,
    handle: ChoreographyHandle,
    cue: Cue,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the timeline was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `cue` to fire `delay` after the current time.
    pub fn schedule(&mut self, handle: ChoreographyHandle, delay: Duration, cue: Cue) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay,
            seq,
            handle,
            cue,
        });
    }

    /// Drop every pending cue of `handle`. Returns how many were dropped.
    pub fn cancel(&mut self, handle: ChoreographyHandle) -> usize {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.handle != handle);
        before - self.pending.len()
    }

    /// Instant of the earliest pending cue.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|pending| pending.due).min()
    }

    /// Remove and return the earliest cue due at or before `until`.
    ///
    /// Cues with equal deadlines come out in scheduling order. The clock moves
    /// to the popped cue's deadline; once nothing is left it moves to `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(ChoreographyHandle, Cue)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= until)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(position, _)| position);

        let Some(position) = position else {
            self.now = self.now.max(until);
            return None;
        };
        let pending = self.pending.remove(position);
        self.now = self.now.max(pending.due);
        Some((pending.handle, pending.cue))
    }
}
