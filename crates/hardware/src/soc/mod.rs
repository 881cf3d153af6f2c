//! Memory Hierarchy Components.
//!
//! This module organizes the memory objects a simulation is built from and
//! the builder that wires them together:
//! 1. **Contract:** The `MemObject` trait and its request types.
//! 2. **Main memory:** The last level, fronted by a latency controller.
//! 3. **Sharing:** The lock-guarded level shared between cores.
//! 4. **Builder:** Assembles per-core private units over the shared level.

/// Hierarchy builder.
pub mod builder;

/// Main memory and its latency controllers.
pub mod memory;

/// Levels shared between cores.
pub mod shared;

/// Memory-object contract.
pub mod traits;

pub use builder::MemoryHierarchy;
pub use shared::{SharedLevel, SharedPort};
pub use traits::{InvReq, MemObject, MemReq};
