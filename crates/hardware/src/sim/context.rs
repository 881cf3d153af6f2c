//! Simulation context.
//!
//! State that every component of a run needs to see: the validated
//! configuration, the reserved Graph Prefetcher window, one event recorder per
//! core, and the phase barrier. The context is built once, before any
//! component, and shared through an `Arc`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::ConfigError;
use crate::config::Config;
use crate::core::timing::EventRecorder;
use crate::core::units::prefetch::graph::GraphWindow;
use crate::sim::barrier::{PhaseBarrier, PhaseSync};

/// Shared state of one simulation.
#[derive(Debug)]
pub struct SimContext {
    config: Config,
    window: GraphWindow,
    recorders: Vec<Arc<Mutex<EventRecorder>>>,
    barrier: Arc<dyn PhaseSync>,
}

impl SimContext {
    /// Validates `config` and builds a context synchronizing through `barrier`.
    pub fn new(config: Config, barrier: Arc<dyn PhaseSync>) -> Result<Self, ConfigError> {
        config.validate()?;
        let recorders = (0..config.general.num_cores)
            .map(|_| Arc::new(Mutex::new(EventRecorder::new(config.memory.banks))))
            .collect();
        let window = GraphWindow::new(
            config.graph_prefetcher.base_addr,
            config.graph_prefetcher.element_size,
        );
        Ok(Self {
            config,
            window,
            recorders,
            barrier,
        })
    }

    /// Builds a shared context with a `PhaseBarrier`.
    pub fn with_phase_barrier(config: Config) -> Result<Arc<Self>, ConfigError> {
        let barrier = Arc::new(PhaseBarrier::new(config.general.phase_length));
        Self::new(config, barrier).map(Arc::new)
    }

    /// The validated configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Number of simulated cores.
    pub const fn num_cores(&self) -> usize {
        self.config.general.num_cores
    }

    /// Cycles per phase.
    pub const fn phase_length(&self) -> u64 {
        self.config.general.phase_length
    }

    /// log2 of the line size.
    pub const fn line_bits(&self) -> u32 {
        self.config.general.line_bits()
    }

    /// Whether main memory leaves timing records for contention attribution.
    pub const fn record_events(&self) -> bool {
        self.config.general.record_events
    }

    /// The reserved Graph Prefetcher address window.
    pub const fn graph_window(&self) -> GraphWindow {
        self.window
    }

    /// The event recorder of `core`.
    pub fn recorder(&self, core: u32) -> &Arc<Mutex<EventRecorder>> {
        &self.recorders[core as usize]
    }

    /// Locks the event recorder of `core`.
    pub fn lock_recorder(&self, core: u32) -> MutexGuard<'_, EventRecorder> {
        self.recorder(core)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The phase barrier.
    pub fn barrier(&self) -> &dyn PhaseSync {
        self.barrier.as_ref()
    }

    /// Cycle at which the current global phase started.
    pub fn global_cycle(&self) -> u64 {
        self.barrier.global_cycle()
    }
}
