//! Setup and configuration error definitions.
//!
//! The timing core has no recoverable error path once a run is in progress:
//! steady-state invariant violations abort through assertions. What can fail
//! recoverably is everything before that point:
//! 1. **Configuration:** Values that cannot describe a buildable hierarchy.
//! 2. **Wiring:** Components connected to the wrong number of parents.
//! 3. **Input:** Config and trace files that cannot be read or parsed.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A configuration value that cannot be simulated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Line size is zero or not a power of two.
    #[error("line size {0} is not a power of two")]
    LineSize(u64),

    /// A simulation needs at least one core.
    #[error("num_cores must be at least 1")]
    NoCores,

    /// Phase length of zero would never let cores advance.
    #[error("phase_length must be non-zero")]
    PhaseLength,

    /// The Graph Prefetcher ring buffer needs at least one slot.
    #[error("graph prefetcher needs at least one destination slot")]
    GraphEntries,

    /// Element size of the reserved window must be non-zero.
    #[error("graph prefetcher element size must be non-zero")]
    ElementSize,

    /// Stream Prefetcher table needs at least one entry.
    #[error("stream prefetcher needs at least one entry")]
    StreamEntries,

    /// Saturating counter parameters are inconsistent.
    #[error("confidence counter invalid: initial {initial}, threshold {threshold}, max {max}")]
    Confidence {
        /// Initial counter value.
        initial: u32,
        /// Prediction threshold.
        threshold: u32,
        /// Saturation value.
        max: u32,
    },

    /// Cache geometry does not produce a whole number of sets.
    #[error("cache {name}: {size_bytes} bytes / {ways} ways does not fit {line_bytes}-byte lines")]
    CacheGeometry {
        /// Which cache level.
        name: String,
        /// Configured capacity.
        size_bytes: usize,
        /// Configured associativity.
        ways: usize,
        /// Line size in bytes.
        line_bytes: u64,
    },

    /// Memory needs at least one bank.
    #[error("memory needs at least one bank")]
    Banks,
}

/// Errors raised while building or feeding a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A component was wired to the wrong number of parents.
    #[error("[{component}] must have exactly one parent, got {got}")]
    ParentCount {
        /// Component name.
        component: String,
        /// Number of parents supplied.
        got: usize,
    },

    /// Number of traces does not match the number of simulated cores.
    #[error("expected {expected} traces (one per core), got {got}")]
    TraceCount {
        /// Configured core count.
        expected: usize,
        /// Supplied trace count.
        got: usize,
    },

    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A config document or trace line is not valid JSON for its schema.
    #[error("failed to parse {what}: {source}")]
    Parse {
        /// What was being parsed (file name and line).
        what: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
