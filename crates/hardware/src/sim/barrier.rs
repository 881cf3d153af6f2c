//! Phase barrier.
//!
//! Cores advance in lock-step phases of `phase_length` cycles. A core that
//! crosses its phase end takes the barrier and blocks until every
//! participating core has arrived; the last arrival advances the global phase
//! clock and wakes the rest. Cores whose trace ends leave the barrier so the
//! remaining cores are not held back.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Synchronization between cores at phase boundaries.
pub trait PhaseSync: Send + Sync + Debug {
    /// Adds `core` to the participants; returns the current global phase cycle.
    fn join(&self, core: u32) -> u64;

    /// Removes `core` from the participants.
    fn leave(&self, core: u32);

    /// Waits for the phase to end.
    ///
    /// # Arguments
    ///
    /// * `core` - The arriving core.
    /// * `context` - The context (software thread) the core was running.
    ///
    /// # Returns
    ///
    /// The context to run next; a different value means a context switch.
    fn take_barrier(&self, core: u32, context: u32) -> u32;

    /// Cycle at which the current global phase started.
    fn global_cycle(&self) -> u64;
}

#[derive(Debug, Default)]
struct BarrierState {
    members: BTreeSet<u32>,
    arrived: usize,
    phase: u64,
}

/// Condition-variable barrier over all participating cores.
#[derive(Debug)]
pub struct PhaseBarrier {
    phase_length: u64,
    state: Mutex<BarrierState>,
    cv: Condvar,
}

impl PhaseBarrier {
    /// Creates a barrier with no participants.
    pub fn new(phase_length: u64) -> Self {
        Self {
            phase_length,
            state: Mutex::new(BarrierState::default()),
            cv: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Completed phases.
    pub fn phase(&self) -> u64 {
        self.lock().phase
    }

    /// Ends the phase if every participant has arrived.
    fn try_advance(&self, state: &mut BarrierState) -> bool {
        if state.arrived > 0 && state.arrived >= state.members.len() {
            state.arrived = 0;
            state.phase += 1;
            debug!(phase = state.phase, "phase complete");
            self.cv.notify_all();
            true
        } else {
            false
        }
    }
}

impl PhaseSync for PhaseBarrier {
    fn join(&self, core: u32) -> u64 {
        let mut state = self.lock();
        let _ = state.members.insert(core);
        debug!(core, members = state.members.len(), "core joined");
        state.phase * self.phase_length
    }

    fn leave(&self, core: u32) {
        let mut state = self.lock();
        if state.members.remove(&core) {
            debug!(core, members = state.members.len(), "core left");
            let _ = self.try_advance(&mut state);
        }
    }

    fn take_barrier(&self, core: u32, context: u32) -> u32 {
        let mut state = self.lock();
        assert!(
            state.members.contains(&core),
            "core {core} took the barrier without joining"
        );
        let phase = state.phase;
        state.arrived += 1;
        if !self.try_advance(&mut state) {
            while state.phase == phase {
                state = self.cv.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
        }
        context
    }

    fn global_cycle(&self) -> u64 {
        self.lock().phase * self.phase_length
    }
}
