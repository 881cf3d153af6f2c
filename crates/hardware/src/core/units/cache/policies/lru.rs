//! Least Recently Used (LRU) Replacement Policy.
//!
//! Every access stamps the way with a monotonically increasing counter; the
//! victim is the way with the oldest stamp.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `fill()`: O(1)
//!   - `victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(S × W) where S is the number of sets

use super::{ReplacementPolicy, oldest};

/// LRU Policy state.
#[derive(Debug)]
pub struct LruPolicy {
    /// Last-access stamp per line, set-major.
    stamps: Vec<u64>,
    ways: usize,
    clock: u64,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            stamps: vec![0; sets * ways],
            ways,
            clock: 0,
        }
    }

    fn stamp(&mut self, set: usize, way: usize) {
        self.clock += 1;
        self.stamps[set * self.ways + way] = self.clock;
    }
}

impl ReplacementPolicy for LruPolicy {
    fn touch(&mut self, set: usize, way: usize) {
        self.stamp(set, way);
    }

    fn fill(&mut self, set: usize, way: usize) {
        self.stamp(set, way);
    }

    fn victim(&mut self, set: usize) -> usize {
        let base = set * self.ways;
        oldest(&self.stamps[base..base + self.ways])
    }
}
