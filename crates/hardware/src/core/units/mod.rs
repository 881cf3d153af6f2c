//! Memory-side functional units.
//!
//! This module contains the components a core's memory accesses pass through
//! before reaching the shared level: the private caches and the prefetchers.

/// Set-associative cache with replacement policies.
pub mod cache;

/// Hardware prefetchers (graph, stream).
pub mod prefetch;
