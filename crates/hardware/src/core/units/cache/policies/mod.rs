//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim lines in set-associative caches.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (per-way access timestamps).
//! - `Fifo`: First-In, First-Out (per-way fill timestamps).
//! - `Random`: Pseudo-random selection.

use crate::config::ReplacementPolicy as PolicyType;

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::RandomPolicy;

/// Trait for cache replacement policies.
///
/// The cache reports every hit (`touch`) and every fill (`fill`); invalid ways
/// are always filled first, so `victim` is only asked when a set is full.
pub trait ReplacementPolicy: Send + std::fmt::Debug {
    /// Records an access to a resident line.
    ///
    /// # Arguments
    ///
    /// * `set` - The cache set index.
    /// * `way` - The way index within the set that was accessed.
    fn touch(&mut self, set: usize, way: usize);

    /// Records that a new line was installed in `way`.
    fn fill(&mut self, set: usize, way: usize);

    /// Selects a victim way to evict from a full set.
    fn victim(&mut self, set: usize) -> usize;
}

/// Builds the policy selected in the configuration.
pub fn policy_for(kind: PolicyType, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyType::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyType::Fifo => Box::new(FifoPolicy::new(sets, ways)),
        PolicyType::Random => Box::new(RandomPolicy::new(ways)),
    }
}

/// Index of the smallest stamp in `stamps` (first one on ties).
fn oldest(stamps: &[u64]) -> usize {
    stamps
        .iter()
        .enumerate()
        .min_by_key(|&(_, stamp)| *stamp)
        .map_or(0, |(way, _)| way)
}
