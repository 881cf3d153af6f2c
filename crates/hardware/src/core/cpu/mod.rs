//! Timing Core Definition and Initialization.
//!
//! This module defines `TimingCore`, the cycle accounting of one simulated
//! hardware thread. It coordinates the following:
//! 1. **Dispatch:** Loads and stores go to the Graph Prefetcher or the L1 data cache.
//! 2. **Execution:** Basic blocks advance the clock and fetch through the L1 instruction cache.
//! 3. **Phases:** Phase boundaries replay contention and take the barrier.
//! 4. **Observability:** Locality sampling (single-core runs) and per-core counters.

/// Basic-block execution and phase synchronization.
pub mod execution;

/// Locality sampling over the data address stream.
pub mod locality;

/// Load/store routing.
pub mod memory;

pub use self::execution::{BasicBlock, BblOutcome};
pub use self::locality::LocalitySampler;
pub use self::memory::Route;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CoreModel;
use crate::core::timing::ContentionRecorder;
use crate::core::units::cache::CacheSim;
use crate::core::units::prefetch::GraphPrefetcher;
use crate::core::units::prefetch::graph::{DestinationDescriptor, SourceDescriptor};
use crate::sim::SimContext;
use crate::stats::CoreStats;

/// Private memory-side units of one core.
#[derive(Debug)]
pub struct CorePorts {
    /// L1 instruction cache.
    pub l1i: CacheSim,
    /// L1 data cache (with the Stream Prefetcher behind it when enabled).
    pub l1d: CacheSim,
    /// Graph Prefetcher serving the reserved window.
    pub graph: GraphPrefetcher,
}

/// Cycle accounting for one simulated hardware thread.
#[derive(Debug)]
pub struct TimingCore {
    id: u32,
    name: String,
    ctx: Arc<SimContext>,
    l1i: CacheSim,
    l1d: CacheSim,
    graph: GraphPrefetcher,
    contention: ContentionRecorder,
    locality: Option<LocalitySampler>,

    cur_cycle: u64,
    phase_end: u64,
    /// Software context the core runs; `None` after a switch to no thread.
    context: Option<u32>,
    offload: bool,

    instrs: u64,
    offload_instrs: u64,
    loads: u64,
    stores: u64,
}

impl TimingCore {
    /// Creates core `id` over its private units.
    ///
    /// The core starts at cycle 0 running context `id` and has not joined the
    /// barrier yet.
    pub fn new(id: u32, ctx: Arc<SimContext>, ports: CorePorts) -> Self {
        let contention = ContentionRecorder::new(Arc::clone(ctx.recorder(id)));
        let model = ctx.config().general.core_model;
        let contention = match model {
            CoreModel::Timing => contention,
            CoreModel::Simple => contention.discard_slip(),
        };
        let locality = (ctx.num_cores() == 1).then(|| {
            LocalitySampler::new(ctx.config().general.locality_window, ctx.line_bits())
        });
        let phase_end = ctx.phase_length();
        info!(core = id, ?model, sampling = locality.is_some(), "timing core created");
        Self {
            id,
            name: format!("core-{id}"),
            ctx,
            l1i: ports.l1i,
            l1d: ports.l1d,
            graph: ports.graph,
            contention,
            locality,
            cur_cycle: 0,
            phase_end,
            context: Some(id),
            offload: false,
            instrs: 0,
            offload_instrs: 0,
            loads: 0,
            stores: 0,
        }
    }

    /// Core index.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Current cycle.
    pub const fn cycle(&self) -> u64 {
        self.cur_cycle
    }

    /// Cycle at which the current phase ends.
    pub const fn phase_end(&self) -> u64 {
        self.phase_end
    }

    /// Software context currently running.
    pub const fn context(&self) -> Option<u32> {
        self.context
    }

    /// Instructions executed.
    pub const fn instrs(&self) -> u64 {
        self.instrs
    }

    /// The L1 instruction cache.
    pub const fn l1i(&self) -> &CacheSim {
        &self.l1i
    }

    /// The L1 data cache.
    pub const fn l1d(&self) -> &CacheSim {
        &self.l1d
    }

    /// The Graph Prefetcher.
    pub const fn graph(&self) -> &GraphPrefetcher {
        &self.graph
    }

    /// Forwards a source descriptor to the Graph Prefetcher.
    pub fn push_source(&mut self, desc: SourceDescriptor) {
        self.graph.push_source(desc);
    }

    /// Forwards a destination descriptor to the Graph Prefetcher.
    pub fn push_destination(&mut self, desc: DestinationDescriptor) {
        self.graph.push_destination(desc);
    }

    /// Marks the start of an offload region.
    pub const fn offload_begin(&mut self) {
        self.offload = true;
    }

    /// Marks the end of an offload region.
    pub const fn offload_end(&mut self) {
        self.offload = false;
    }

    /// Starts participating in the phase barrier.
    ///
    /// The clock catches up with the global phase clock and the phase end is
    /// recomputed from it.
    pub fn join(&mut self) {
        debug!(name = %self.name, cur = self.cur_cycle, phase_end = self.phase_end, "joining");
        let global = self.ctx.barrier().join(self.id);
        self.cur_cycle = self.contention.notify_join(self.cur_cycle, global);
        self.phase_end = global + self.ctx.phase_length();
        debug!(name = %self.name, cur = self.cur_cycle, phase_end = self.phase_end, "joined");
    }

    /// Stops participating in the phase barrier.
    ///
    /// Outstanding contention of the current phase is settled first.
    pub fn leave(&mut self) {
        self.cur_cycle = self.contention.end_phase(self.cur_cycle);
        self.contention.notify_leave(self.cur_cycle);
        self.ctx.barrier().leave(self.id);
        debug!(name = %self.name, cur = self.cur_cycle, "left");
    }

    /// Switches the core to software context `next`.
    ///
    /// Switching to no thread drops the contents of both L1 caches.
    pub fn context_switch(&mut self, next: Option<u32>) {
        if next.is_none() {
            self.l1i.context_switch();
            self.l1d.context_switch();
        }
        debug!(name = %self.name, from = ?self.context, to = ?next, "context switch");
        self.context = next;
    }

    /// Counters of the core and its Graph Prefetcher.
    ///
    /// Locality is only sampled in single-core runs and reads 0 otherwise.
    pub fn finish(&self) -> CoreStats {
        let (spatial, temporal) = self
            .locality
            .as_ref()
            .map_or((0, 0), LocalitySampler::scaled);
        CoreStats {
            core: self.id,
            cycles: self.cur_cycle,
            contention_cycles: self.contention.contention_cycles(),
            unhalted_cycles: self.contention.unhalted_cycles(self.cur_cycle),
            instrs: self.instrs,
            offload_instrs: self.offload_instrs,
            loads: self.loads,
            stores: self.stores,
            spatial_locality: spatial,
            temporal_locality: temporal,
            graph_prefetcher: self.graph.stats().clone(),
        }
    }
}
