//! Simulation driver.
//!
//! Everything above a single core: the shared simulation context, the phase
//! barrier cores synchronize on, the trace format that feeds them, and the
//! simulator that runs one thread per core.

/// Phase barrier.
pub mod barrier;

/// Shared simulation context.
pub mod context;

/// Hierarchy construction and multi-core trace replay.
pub mod simulator;

/// JSON-lines trace format.
pub mod trace;

pub use self::barrier::{PhaseBarrier, PhaseSync};
pub use self::context::SimContext;
pub use self::simulator::Simulator;
pub use self::trace::{DataAccess, TraceEvent};
