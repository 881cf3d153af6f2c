//! Load/Store Dispatch.
//!
//! Data accesses either address the reserved Graph Prefetcher window or go
//! through the L1 data cache. The routing decision is made once per access
//! and carried as a `Route`, so neither port sees accesses it cannot serve.
//! After each dispatch the core's clock moves to the completion cycle and the
//! access's timing record (if any) is chained for contention replay.

use super::TimingCore;
use crate::common::{AccessKind, LineAddr, ReqFlags};
use crate::core::units::prefetch::graph::{GraphField, GraphWindow};
use crate::soc::traits::{MemObject, MemReq};

/// Where a data access is served.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// A field of the Graph Prefetcher window.
    Graph(GraphField),
    /// The L1 data cache.
    Cache,
}

impl Route {
    /// Routes `addr` against the reserved `window`.
    pub const fn of(window: &GraphWindow, addr: u64) -> Self {
        match window.field(addr) {
            Some(field) => Self::Graph(field),
            None => Self::Cache,
        }
    }
}

impl TimingCore {
    /// Route of a data access to `addr`.
    pub fn route(&self, addr: u64) -> Route {
        Route::of(&self.ctx.graph_window(), addr)
    }

    /// Demand load of `size` bytes at `addr`; returns the completion cycle.
    pub fn load(&mut self, addr: u64, size: u32) -> u64 {
        self.data_access(addr, size, AccessKind::Gets)
    }

    /// Store of `size` bytes at `addr`; returns the completion cycle.
    pub fn store(&mut self, addr: u64, size: u32) -> u64 {
        self.data_access(addr, size, AccessKind::Getx)
    }

    fn data_access(&mut self, addr: u64, size: u32, kind: AccessKind) -> u64 {
        let start = self.cur_cycle;
        let is_load = kind == AccessKind::Gets;
        self.cur_cycle = match self.route(addr) {
            Route::Graph(field) if is_load => self.graph.load(field, start),
            Route::Graph(field) => self.graph.store(field, start),
            Route::Cache => {
                let line = LineAddr::from_byte(addr, self.ctx.line_bits());
                let mut req = MemReq::new(line, kind, start, self.id);
                self.l1d.access(&mut req)
            }
        };
        self.contention.record(start);

        if is_load {
            self.loads += 1;
        } else {
            self.stores += 1;
        }
        if let Some(sampler) = self.locality.as_mut() {
            sampler.push(addr, size);
        }
        self.cur_cycle
    }

    /// Fetches one instruction line at `addr` through the L1 instruction cache.
    pub(super) fn fetch(&mut self, addr: u64) {
        let start = self.cur_cycle;
        let line = LineAddr::from_byte(addr, self.ctx.line_bits());
        let mut req =
            MemReq::new(line, AccessKind::Gets, start, self.id).with_flags(ReqFlags::IFETCH);
        self.cur_cycle = self.l1i.access(&mut req);
        self.contention.record(start);
    }
}
