//! Common utilities and types used throughout the timing core.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Address Types:** A strong type for cache-line addresses and region decomposition.
//! 2. **Constants:** Graph Prefetcher field layout and stream-region geometry.
//! 3. **Memory Access:** Request kinds, coherence states, and request flags.
//! 4. **Error Handling:** Configuration and setup error types.

/// Line address type definitions.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for configuration and setup.
pub mod error;

pub use addr::LineAddr;
pub use data::{AccessKind, CoherenceState, ReqFlags};
pub use error::{ConfigError, SimError};
