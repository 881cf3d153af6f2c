//! Main memory.
//!
//! The last level of the hierarchy. It provides:
//! 1. **Latency:** Delegated to the configured controller (simple or DRAM row-buffer).
//! 2. **Permissions:** Reads are granted exclusively; writebacks are absorbed.
//! 3. **Timing records:** Each read leaves a record whose subgraph occupies the
//!    line's memory bank, so that event replay exposes bank conflicts.

/// Memory controller implementations for access latency modeling.
pub mod controller;

use std::sync::Arc;

use tracing::trace;

use self::controller::{MemoryController, controller_for};
use crate::common::{AccessKind, CoherenceState};
use crate::core::timing::{EventKind, TimingRecord};
use crate::sim::SimContext;
use crate::soc::traits::{InvReq, MemObject, MemReq};
use crate::stats::{ComponentStats, MemoryStats, NamedStats};

/// Main memory behind a latency controller.
#[derive(Debug)]
pub struct MainMemory {
    name: String,
    ctx: Arc<SimContext>,
    controller: Box<dyn MemoryController>,
    banks: usize,
    occupancy: u64,
    stats: MemoryStats,
}

impl MainMemory {
    /// Creates main memory using the controller selected in the context's configuration.
    pub fn new(name: impl Into<String>, ctx: Arc<SimContext>) -> Self {
        let controller = controller_for(&ctx.config().memory);
        Self::with_controller(name, ctx, controller)
    }

    /// Creates main memory with an explicit controller.
    pub fn with_controller(
        name: impl Into<String>,
        ctx: Arc<SimContext>,
        controller: Box<dyn MemoryController>,
    ) -> Self {
        let mem = &ctx.config().memory;
        let (banks, occupancy) = (mem.banks, mem.bank_occupancy);
        Self {
            name: name.into(),
            ctx,
            controller,
            banks,
            occupancy,
            stats: MemoryStats::default(),
        }
    }

    /// Access counters.
    pub const fn stats(&self) -> &MemoryStats {
        &self.stats
    }

    fn record(&self, req: &MemReq, byte_addr: u64, latency: u64, resp: u64) {
        let bank = self.controller.bank_of(byte_addr, self.banks);
        let occupancy = self.occupancy.min(latency);
        let mut recorder = self.ctx.lock_recorder(req.src_id);
        let arena = recorder.arena_mut();
        let start = arena.add(EventKind::Dummy, req.cycle);
        let busy = arena.chain(start, EventKind::Resource { bank, occupancy });
        let end = arena.chain_held(busy, EventKind::Delay(latency - occupancy));
        recorder.push_record(TimingRecord {
            addr: req.line_addr,
            req_cycle: req.cycle,
            resp_cycle: resp,
            kind: req.kind,
            start,
            end,
        });
    }
}

impl MemObject for MainMemory {
    fn access(&mut self, req: &mut MemReq) -> u64 {
        self.stats.accesses += 1;
        let byte_addr = req.line_addr.val() << self.ctx.line_bits();
        let latency = self.controller.access_latency(byte_addr);
        let resp = req.cycle + latency;

        match req.kind {
            AccessKind::Gets | AccessKind::Getx => {
                self.stats.reads += 1;
                req.state = if req.kind == AccessKind::Getx {
                    CoherenceState::Modified
                } else {
                    CoherenceState::Exclusive
                };
                if self.ctx.record_events() {
                    self.record(req, byte_addr, latency, resp);
                }
            }
            AccessKind::Putx => {
                self.stats.writes += 1;
                req.state = CoherenceState::Invalid;
            }
        }
        trace!(line = %req.line_addr, kind = ?req.kind, cycle = req.cycle, resp, "memory access");
        resp
    }

    fn invalidate(&mut self, req: &InvReq) -> u64 {
        req.cycle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn collect_stats(&self, out: &mut Vec<NamedStats>) {
        out.push(NamedStats {
            name: self.name.clone(),
            stats: ComponentStats::Memory(self.stats.clone()),
        });
    }
}
