//! Memory-object contract.
//!
//! This module defines the `MemObject` trait implemented by every level of the
//! memory hierarchy (caches, the Stream Prefetcher, shared ports, and main
//! memory). It provides:
//! 1. **Requests:** `MemReq` carries the line, kind, requester, coherence state, and issue cycle.
//! 2. **Access:** `access` returns the completion cycle; latency is a number, never a wait.
//! 3. **Invalidation:** `invalidate` drops a line on the way down from a parent.
//! 4. **Statistics:** `collect_stats` appends the component's named counters.
//!
//! Objects are `Send` so that private levels can move onto per-core threads;
//! levels shared between cores sit behind a `SharedPort` whose mutex guard is
//! the lock token of the access.

use std::fmt::Debug;

use crate::common::{AccessKind, CoherenceState, LineAddr, ReqFlags};
use crate::stats::NamedStats;

/// A memory request travelling towards main memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemReq {
    /// Line being accessed.
    pub line_addr: LineAddr,
    /// Request kind.
    pub kind: AccessKind,
    /// Index of the child the request came from.
    pub child_id: u32,
    /// Coherence state: held by the requester on the way in, granted on the way out.
    pub state: CoherenceState,
    /// Issue cycle.
    pub cycle: u64,
    /// Requesting core; selects the event recorder timing records go to.
    pub src_id: u32,
    /// Request modifiers.
    pub flags: ReqFlags,
}

impl MemReq {
    /// Creates a request from `src_id` with no held state and no flags.
    pub const fn new(line_addr: LineAddr, kind: AccessKind, cycle: u64, src_id: u32) -> Self {
        Self {
            line_addr,
            kind,
            child_id: 0,
            state: CoherenceState::Invalid,
            cycle,
            src_id,
            flags: ReqFlags::NONE,
        }
    }

    /// Returns the request with `flags` added.
    #[must_use]
    pub const fn with_flags(mut self, flags: ReqFlags) -> Self {
        self.flags = self.flags.with(flags);
        self
    }

    /// Returns `true` for speculative requests.
    #[inline]
    pub const fn is_prefetch(&self) -> bool {
        self.flags.contains(ReqFlags::PREFETCH)
    }
}

/// An invalidation travelling away from main memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvReq {
    /// Line to drop.
    pub line_addr: LineAddr,
    /// Cycle the invalidation arrives.
    pub cycle: u64,
    /// Core on whose behalf the invalidation is sent.
    pub src_id: u32,
}

/// A level of the memory hierarchy.
pub trait MemObject: Send + Debug {
    /// Performs an access and returns its completion cycle.
    ///
    /// # Arguments
    ///
    /// * `req` - The request; `req.state` is updated with the granted state.
    ///
    /// # Returns
    ///
    /// The cycle at which the response is available (never before `req.cycle`).
    fn access(&mut self, req: &mut MemReq) -> u64;

    /// Drops `req.line_addr` and returns the cycle the invalidation completes.
    fn invalidate(&mut self, req: &InvReq) -> u64;

    /// Component name used in statistics.
    fn name(&self) -> &str;

    /// Appends this object's counters (and those of privately owned parents).
    fn collect_stats(&self, out: &mut Vec<NamedStats>);
}
