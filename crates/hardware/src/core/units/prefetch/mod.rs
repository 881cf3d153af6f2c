//! Hardware prefetchers.
//!
//! This module contains the two prefetchers of the timing core:
//! 1. **Graph Prefetcher:** Descriptor-driven prefetching for vertex-centric graph kernels.
//! 2. **Stream Prefetcher:** Per-region stride detection between two memory levels.
//! 3. **Saturating Counter:** The confidence primitive the Stream Prefetcher trains.

/// Graph Prefetcher (address window, descriptors, destination ring).
pub mod graph;

/// Runtime-configured saturating counter.
pub mod sat_counter;

/// Stream prefetcher (detects constant-stride access patterns per region).
pub mod stream;

pub use self::graph::GraphPrefetcher;
pub use self::sat_counter::SatCounter;
pub use self::stream::StreamPrefetcher;
