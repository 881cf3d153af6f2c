//! Saturating confidence counter.
//!
//! A counter clamped to `[0, max]` that predicts once it reaches `threshold`.
//! Bounds are runtime values so the Stream Prefetcher's confidence can be
//! configured without recompiling.

use crate::config::StreamPrefetcherConfig;

/// Bounded confidence counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SatCounter {
    count: u32,
    max: u32,
    threshold: u32,
    initial: u32,
}

impl SatCounter {
    /// Creates a counter starting (and resetting) at `initial`.
    ///
    /// # Arguments
    ///
    /// * `max` - Saturation value.
    /// * `threshold` - Minimum count at which `pred` is true.
    /// * `initial` - Start and reset value (clamped to `max`).
    pub const fn new(max: u32, threshold: u32, initial: u32) -> Self {
        let initial = if initial > max { max } else { initial };
        Self {
            count: initial,
            max,
            threshold,
            initial,
        }
    }

    /// Creates the Stream Prefetcher's confidence counter.
    pub const fn from_config(cfg: &StreamPrefetcherConfig) -> Self {
        Self::new(cfg.conf_max, cfg.conf_threshold, cfg.conf_initial)
    }

    /// Returns to the initial value.
    #[inline]
    pub const fn reset(&mut self) {
        self.count = self.initial;
    }

    /// Increments, saturating at `max`.
    #[inline]
    pub const fn inc(&mut self) {
        if self.count < self.max {
            self.count += 1;
        }
    }

    /// Decrements, saturating at zero.
    #[inline]
    pub const fn dec(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    /// Returns `true` at or above the threshold.
    #[inline]
    pub const fn pred(&self) -> bool {
        self.count >= self.threshold
    }

    /// Current count.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.count
    }
}
