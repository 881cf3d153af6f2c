//! Memory controller implementations for latency modeling.
//!
//! This module provides:
//! 1. **SimpleController:** Fixed latency per access (no row-buffer modeling).
//! 2. **DramController:** Row-buffer-aware latency (CAS, RAS, precharge) for DRAM-style timing.
//! 3. **Selection:** `controller_for` builds the configured controller.

use std::fmt::Debug;

use crate::config::{self, MemoryConfig};

/// Bytes covered by one DRAM row.
const ROW_BYTES: u64 = 2048;

/// Trait for memory controller implementations that report access latency in cycles.
pub trait MemoryController: Send + Debug {
    /// Returns the number of cycles required for an access to the given address.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address being accessed (used for row-buffer modeling).
    ///
    /// # Returns
    ///
    /// Latency in simulation cycles.
    fn access_latency(&mut self, addr: u64) -> u64;

    /// Bank an address maps to, given `banks` banks.
    fn bank_of(&self, addr: u64, banks: usize) -> usize {
        ((addr / ROW_BYTES) % banks.max(1) as u64) as usize
    }
}

/// Fixed-latency memory controller; every access takes the same number of cycles.
#[derive(Debug)]
pub struct SimpleController {
    latency: u64,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency in cycles.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// DRAM-style controller with a single open row; models CAS, RAS, and precharge.
#[derive(Debug)]
pub struct DramController {
    open_row: Option<u64>,
    t_cas: u64,
    t_ras: u64,
    t_pre: u64,
}

impl DramController {
    /// Creates a DRAM controller with the given timing parameters (in cycles).
    ///
    /// # Arguments
    ///
    /// * `t_cas` - Column access strobe latency.
    /// * `t_ras` - Row access strobe latency.
    /// * `t_pre` - Precharge latency.
    pub const fn new(t_cas: u64, t_ras: u64, t_pre: u64) -> Self {
        Self {
            open_row: None,
            t_cas,
            t_ras,
            t_pre,
        }
    }
}

impl MemoryController for DramController {
    fn access_latency(&mut self, addr: u64) -> u64 {
        let row = addr & !(ROW_BYTES - 1);
        match self.open_row.replace(row) {
            Some(open) if open == row => self.t_cas,
            Some(_) => self.t_pre + self.t_ras + self.t_cas,
            None => self.t_ras + self.t_cas,
        }
    }
}

/// Builds the controller selected by `cfg.controller`.
pub fn controller_for(cfg: &MemoryConfig) -> Box<dyn MemoryController> {
    match cfg.controller {
        config::MemoryController::Simple => Box::new(SimpleController::new(cfg.latency)),
        config::MemoryController::Dram => {
            Box::new(DramController::new(cfg.t_cas, cfg.t_ras, cfg.t_pre))
        }
    }
}
