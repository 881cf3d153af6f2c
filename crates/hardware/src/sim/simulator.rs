//! Simulator: the memory hierarchy plus one timing core per trace.
//!
//! Each core replays its trace on its own thread. Cores meet at phase
//! boundaries through the context's barrier; a core whose trace ends leaves
//! the barrier so the others keep advancing.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::info;

use crate::common::SimError;
use crate::config::Config;
use crate::core::cpu::TimingCore;
use crate::sim::context::SimContext;
use crate::sim::trace::TraceEvent;
use crate::soc::builder::MemoryHierarchy;
use crate::soc::shared::{self, SharedLevel};
use crate::soc::traits::MemObject;
use crate::stats::SimStats;

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    ctx: Arc<SimContext>,
    shared: SharedLevel,
    cores: Vec<TimingCore>,
}

impl Simulator {
    /// Validates `config` and builds a simulator synchronizing through a `PhaseBarrier`.
    ///
    /// # Errors
    ///
    /// Configuration and wiring errors.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let ctx = SimContext::with_phase_barrier(config)?;
        Self::with_context(ctx)
    }

    /// Builds a simulator over an existing context.
    ///
    /// # Errors
    ///
    /// Wiring errors from hierarchy construction.
    pub fn with_context(ctx: Arc<SimContext>) -> Result<Self, SimError> {
        let (shared, ports) = MemoryHierarchy::build(&ctx)?.into_parts();
        let cores = ports
            .into_iter()
            .zip(0u32..)
            .map(|(ports, id)| TimingCore::new(id, Arc::clone(&ctx), ports))
            .collect();
        Ok(Self { ctx, shared, cores })
    }

    /// The simulation context.
    pub const fn context(&self) -> &Arc<SimContext> {
        &self.ctx
    }

    /// The timing cores.
    pub fn cores(&self) -> &[TimingCore] {
        &self.cores
    }

    /// Replays one trace per core and returns the statistics.
    ///
    /// # Errors
    ///
    /// `SimError::TraceCount` unless exactly one trace per core is given.
    pub fn run(&mut self, traces: &[Vec<TraceEvent>]) -> Result<SimStats, SimError> {
        if traces.len() != self.cores.len() {
            return Err(SimError::TraceCount {
                expected: self.cores.len(),
                got: traces.len(),
            });
        }
        let start_time = Instant::now();
        info!(cores = self.cores.len(), "simulation started");

        // Everyone joins before anyone can reach a phase boundary.
        for core in &mut self.cores {
            core.join();
        }
        thread::scope(|s| {
            for (core, trace) in self.cores.iter_mut().zip(traces) {
                let _ = s.spawn(move || {
                    for event in trace {
                        let _ = event.apply(core);
                    }
                    core.leave();
                });
            }
        });

        let stats = self.stats().since(start_time);
        info!(cycles = stats.cycles(), instrs = stats.instrs(), "simulation finished");
        Ok(stats)
    }

    /// Counters of every core and component.
    pub fn stats(&self) -> SimStats {
        let mut stats = SimStats::default();
        for core in &self.cores {
            stats.cores.push(core.finish());
            core.l1i().collect_stats(&mut stats.components);
            core.l1d().collect_stats(&mut stats.components);
        }
        shared::collect_shared(&self.shared, &mut stats.components);
        stats
    }
}
