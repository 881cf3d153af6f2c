//! Simulation driver tests.

/// Phase barrier across threads.
pub mod barrier;

/// Simulator end-to-end runs.
pub mod simulator;
