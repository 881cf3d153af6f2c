//! Cycle-level memory timing core.
//!
//! This crate computes the cycle cost of a core's memory accesses with the following:
//! 1. **Timing Core:** Per-thread cycle accounting, load/store routing, and phase synchronization.
//! 2. **Graph Prefetcher:** Descriptor-driven speculative fetching for graph kernels.
//! 3. **Stream Prefetcher:** Per-region stride detection between two memory levels.
//! 4. **Event Graph:** Timing events replayed at phase ends to attribute contention.
//! 5. **Memory Hierarchy:** Reference caches and main memory behind a uniform access contract.
//! 6. **Simulation:** Configuration, trace replay across cores, and statistics collection.

/// Common types and constants (line addresses, request kinds, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Timing core (dispatch, execution, event graph, caches, prefetchers).
pub mod core;
/// Simulation driver (context, barrier, trace format, simulator).
pub mod sim;
/// Memory hierarchy (contract, shared level, main memory, builder).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Timing core of one simulated hardware thread.
pub use crate::core::TimingCore;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
