//! Contention-cycle recorder.
//!
//! Links every access a core performs into one chain of timing events,
//! separated by delay nodes for the gaps in between. At the end of a phase the
//! chain is replayed: any slip of the last access past its recorded response
//! cycle is time lost to contention (bank conflicts) that the inline cycle
//! arithmetic did not see, and the core's clock is pushed forward by it.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::event::{EventId, EventKind};
use super::recorder::EventRecorder;

/// Per-core contention bookkeeping.
#[derive(Debug)]
pub struct ContentionRecorder {
    recorder: Arc<Mutex<EventRecorder>>,
    last: Option<(EventId, u64)>,
    records: u64,
    contention_cycles: u64,
    halted_cycles: u64,
    left_at: Option<u64>,
    charge_slip: bool,
}

impl ContentionRecorder {
    /// Creates a recorder chaining events in the core's event recorder.
    pub const fn new(recorder: Arc<Mutex<EventRecorder>>) -> Self {
        Self {
            recorder,
            last: None,
            records: 0,
            contention_cycles: 0,
            halted_cycles: 0,
            left_at: None,
            charge_slip: true,
        }
    }

    /// Keeps replaying the chain but never moves the clock by its slip.
    #[must_use]
    pub const fn discard_slip(mut self) -> Self {
        self.charge_slip = false;
        self
    }

    /// Consumes the outstanding timing record of an access that started at
    /// `start_cycle`, if the memory hierarchy left one.
    pub fn record(&mut self, start_cycle: u64) {
        let mut guard = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(rec) = guard.pop_record() else {
            return;
        };
        debug_assert!(rec.req_cycle >= start_cycle);
        let arena = guard.arena_mut();
        if let Some((prev, prev_resp)) = self.last.take() {
            if arena.can_add_child(prev) {
                let gap = rec.req_cycle.saturating_sub(prev_resp);
                let delay = arena.chain(prev, EventKind::Delay(gap));
                let _ = arena.add_child(delay, rec.start);
            }
            arena.release(prev);
        }
        self.last = Some((rec.end, rec.resp_cycle));
        self.records += 1;
    }

    /// Replays the phase's events and returns `cur_cycle` advanced by the
    /// contention they reveal.
    pub fn end_phase(&mut self, cur_cycle: u64) -> u64 {
        let mut guard = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        let arena = guard.arena_mut();
        let _ = arena.replay();

        let mut slip = 0;
        if let Some((end, resp)) = self.last.take() {
            if let Some(done) = arena.done_cycle(end) {
                slip = done.saturating_sub(resp);
            }
            arena.release(end);
        }
        if !self.charge_slip {
            return cur_cycle;
        }
        if slip > 0 {
            debug!(slip, cur_cycle, "contention slip");
        }
        self.contention_cycles += slip;
        cur_cycle + slip
    }

    /// Resumes after a leave; returns the cycle the core continues from.
    pub fn notify_join(&mut self, cur_cycle: u64, global_cycle: u64) -> u64 {
        let resumed = cur_cycle.max(global_cycle);
        if let Some(left) = self.left_at.take() {
            self.halted_cycles += resumed.saturating_sub(left);
        }
        resumed
    }

    /// Notes that the core stopped participating at `cur_cycle`.
    pub const fn notify_leave(&mut self, cur_cycle: u64) {
        self.left_at = Some(cur_cycle);
    }

    /// Records consumed so far.
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Cycles attributed to contention.
    pub const fn contention_cycles(&self) -> u64 {
        self.contention_cycles
    }

    /// Cycles the core spent participating in the simulation.
    pub const fn unhalted_cycles(&self, cur_cycle: u64) -> u64 {
        cur_cycle.saturating_sub(self.halted_cycles)
    }
}
