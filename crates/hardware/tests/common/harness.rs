use crate::common::mocks::barrier::MockBarrier;
use graphsim_core::config::Config;
use graphsim_core::core::cpu::TimingCore;
use graphsim_core::sim::{PhaseSync, SimContext};
use graphsim_core::soc::MemoryHierarchy;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Routes library logs to the test writer (`RUST_LOG` selects the level).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Single-core configuration with small caches and round latencies.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.cache.l1_i.size_bytes = 4 * 1024;
    config.cache.l1_i.ways = 4;
    config.cache.l1_d.size_bytes = 4 * 1024;
    config.cache.l1_d.ways = 4;
    config.cache.l2.size_bytes = 64 * 1024;
    config.cache.l2.ways = 8;
    config.memory.latency = 100;
    config.general.phase_length = 1_000_000;
    config
}

/// Context over a `PhaseBarrier`.
pub fn context(config: Config) -> Arc<SimContext> {
    init_tracing();
    SimContext::with_phase_barrier(config).unwrap()
}

/// Context over an arbitrary barrier.
pub fn context_with(config: Config, barrier: Arc<dyn PhaseSync>) -> Arc<SimContext> {
    init_tracing();
    Arc::new(SimContext::new(config, barrier).unwrap())
}

/// A fully wired core 0 (caches, shared L2, memory) over `barrier`.
pub struct TestContext {
    pub ctx: Arc<SimContext>,
    pub core: TimingCore,
}

impl TestContext {
    pub fn new(config: Config, barrier: MockBarrier) -> Self {
        let ctx = context_with(config, Arc::new(barrier));
        let (_shared, mut ports) = MemoryHierarchy::build(&ctx).unwrap().into_parts();
        let core = TimingCore::new(0, Arc::clone(&ctx), ports.remove(0));
        Self { ctx, core }
    }

    /// Core over a barrier that never interferes.
    pub fn passive(config: Config) -> Self {
        Self::new(config, MockBarrier::passive(0))
    }

    /// Address of Graph Prefetcher field `index`.
    pub fn graph_addr(&self, index: u64) -> u64 {
        let window = self.ctx.graph_window();
        window.base() + index * window.element_size()
    }
}

/// Pops the outstanding record of `core` (if any) and releases its end event,
/// standing in for the core's contention recorder.
pub fn drain_record(ctx: &SimContext, core: u32) {
    let mut recorder = ctx.lock_recorder(core);
    if let Some(rec) = recorder.pop_record() {
        recorder.arena_mut().release(rec.end);
    }
}
