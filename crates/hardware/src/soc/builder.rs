//! Memory hierarchy construction.
//!
//! This module builds the hierarchy from configuration. It performs:
//! 1. **Shared level:** Main memory behind the L2, wrapped for sharing between cores.
//! 2. **Data path:** Per core, an L1 data cache over the Stream Prefetcher (when
//!    enabled) over a port on the shared level.
//! 3. **Instruction path:** Per core, an L1 instruction cache over a shared-level port.
//! 4. **Graph Prefetcher:** Per core, speculating directly into the shared level.
//!
//! Component names: `l1i-N`, `l1d-N`, `stream-N`, `graph-N`, `l2`, `mem`.

use std::sync::Arc;

use tracing::info;

use crate::common::SimError;
use crate::core::cpu::CorePorts;
use crate::core::units::cache::CacheSim;
use crate::core::units::prefetch::{GraphPrefetcher, StreamPrefetcher};
use crate::sim::SimContext;
use crate::soc::memory::MainMemory;
use crate::soc::shared::{self, SharedLevel, SharedPort};
use crate::soc::traits::MemObject;
use crate::stats::NamedStats;

/// Name of the shared L2 cache.
pub const L2_NAME: &str = "l2";

/// Name of main memory.
pub const MEMORY_NAME: &str = "mem";

/// The built hierarchy: one set of private units per core over one shared level.
#[derive(Debug)]
pub struct MemoryHierarchy {
    shared: SharedLevel,
    cores: Vec<CorePorts>,
}

impl MemoryHierarchy {
    /// Builds the hierarchy described by the context's configuration.
    ///
    /// # Errors
    ///
    /// Propagates wiring errors from component construction.
    pub fn build(ctx: &Arc<SimContext>) -> Result<Self, SimError> {
        let cfg = ctx.config();
        let line_bytes = cfg.general.line_bytes;

        let memory = MainMemory::new(MEMORY_NAME, Arc::clone(ctx));
        let l2 = CacheSim::new(L2_NAME, &cfg.cache.l2, line_bytes, 0, Box::new(memory));
        let shared = shared::share(Box::new(l2));

        let cores = (0..ctx.num_cores() as u32)
            .map(|id| Self::build_core(ctx, &shared, id))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            cores = cores.len(),
            stream = cfg.stream_prefetcher.enabled,
            controller = ?cfg.memory.controller,
            "memory hierarchy built"
        );
        Ok(Self { shared, cores })
    }

    fn build_core(
        ctx: &Arc<SimContext>,
        shared: &SharedLevel,
        id: u32,
    ) -> Result<CorePorts, SimError> {
        let cfg = ctx.config();
        let line_bytes = cfg.general.line_bytes;
        let port = |name: String| -> Box<dyn MemObject> {
            Box::new(SharedPort::new(name, Arc::clone(shared)))
        };

        let l1i = CacheSim::new(
            format!("l1i-{id}"),
            &cfg.cache.l1_i,
            line_bytes,
            2 * id,
            port(format!("l1i-{id}-port")),
        );

        let data_parent: Box<dyn MemObject> = if cfg.stream_prefetcher.enabled {
            Box::new(StreamPrefetcher::new(
                format!("stream-{id}"),
                &cfg.stream_prefetcher,
                Arc::clone(ctx),
                port(format!("stream-{id}-port")),
            ))
        } else {
            port(format!("l1d-{id}-port"))
        };
        let l1d = CacheSim::new(
            format!("l1d-{id}"),
            &cfg.cache.l1_d,
            line_bytes,
            2 * id + 1,
            data_parent,
        );

        let graph = GraphPrefetcher::new(
            format!("graph-{id}"),
            id,
            Arc::clone(ctx),
            vec![port(format!("graph-{id}-port"))],
        )?;

        Ok(CorePorts { l1i, l1d, graph })
    }

    /// The shared level (L2 and main memory).
    pub const fn shared(&self) -> &SharedLevel {
        &self.shared
    }

    /// Number of cores built.
    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    /// Appends the counters of the shared level.
    pub fn collect_shared(&self, out: &mut Vec<NamedStats>) {
        shared::collect_shared(&self.shared, out);
    }

    /// Splits the hierarchy into the shared level and each core's private units.
    pub fn into_parts(self) -> (SharedLevel, Vec<CorePorts>) {
        (self.shared, self.cores)
    }
}
