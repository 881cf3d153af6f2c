//! Locality sampling.
//!
//! Keeps the last `window` data lines a core touched. A line already in the
//! window is a temporal reuse; a line adjacent to one in the window is a
//! spatial reuse. Purely observational: nothing in the timing model reads it.

use std::collections::VecDeque;

/// Fixed-point scale of the reported locality ratios.
pub const LOCALITY_SCALE: u64 = 10_000;

/// Sliding-window reuse sampler over line addresses.
#[derive(Clone, Debug)]
pub struct LocalitySampler {
    recent: VecDeque<u64>,
    window: usize,
    line_bits: u32,
    samples: u64,
    spatial_hits: u64,
    temporal_hits: u64,
}

impl LocalitySampler {
    /// Creates a sampler remembering `window` lines of `1 << line_bits` bytes.
    pub fn new(window: usize, line_bits: u32) -> Self {
        let window = window.max(1);
        Self {
            recent: VecDeque::with_capacity(window),
            window,
            line_bits,
            samples: 0,
            spatial_hits: 0,
            temporal_hits: 0,
        }
    }

    /// Samples an access of `size` bytes at `addr` (one sample per line touched).
    pub fn push(&mut self, addr: u64, size: u32) {
        let first = addr >> self.line_bits;
        let last = addr.saturating_add(u64::from(size.max(1)) - 1) >> self.line_bits;
        for line in first..=last {
            self.sample(line);
        }
    }

    fn sample(&mut self, line: u64) {
        self.samples += 1;
        if self.recent.contains(&line) {
            self.temporal_hits += 1;
        } else if self
            .recent
            .iter()
            .any(|&l| l.abs_diff(line) == 1)
        {
            self.spatial_hits += 1;
        }
        if self.recent.len() == self.window {
            let _ = self.recent.pop_front();
        }
        self.recent.push_back(line);
    }

    /// Lines sampled.
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// (spatial, temporal) reuse ratios ×`LOCALITY_SCALE`.
    pub fn scaled(&self) -> (u64, u64) {
        if self.samples == 0 {
            return (0, 0);
        }
        (
            self.spatial_hits * LOCALITY_SCALE / self.samples,
            self.temporal_hits * LOCALITY_SCALE / self.samples,
        )
    }
}
