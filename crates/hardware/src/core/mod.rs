//! Core timing model.
//!
//! This module contains everything one simulated hardware thread owns: the
//! cycle-accounting core itself, the timing event graph used to attribute
//! contention, and the private memory-side units.

/// Timing core: dispatch, basic-block execution, and phase synchronization.
pub mod cpu;

/// Timing events, event recorders, and the contention recorder.
pub mod timing;

/// Private memory-side units (caches, prefetchers).
pub mod units;

pub use self::cpu::TimingCore;
