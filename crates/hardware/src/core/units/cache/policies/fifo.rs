//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the line that was installed first, regardless of how
//! recently it was accessed: only fills advance a way's stamp.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(1), no state change
//!   - `victim()`: O(W)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality

use super::{ReplacementPolicy, oldest};

/// FIFO Policy state.
#[derive(Debug)]
pub struct FifoPolicy {
    /// Fill stamp per line, set-major.
    filled: Vec<u64>,
    ways: usize,
    clock: u64,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            filled: vec![0; sets * ways],
            ways,
            clock: 0,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn touch(&mut self, _set: usize, _way: usize) {}

    fn fill(&mut self, set: usize, way: usize) {
        self.clock += 1;
        self.filled[set * self.ways + way] = self.clock;
    }

    fn victim(&mut self, set: usize) -> usize {
        let base = set * self.ways;
        oldest(&self.filled[base..base + self.ways])
    }
}
