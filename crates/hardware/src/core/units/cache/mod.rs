//! Set-Associative Cache Simulator.
//!
//! This module implements a configurable set-associative cache as a memory
//! object. It models hits, misses, coherence permissions, and dirty-victim
//! writebacks; misses are forwarded to the parent object and the completion
//! cycle of the fill is returned to the child.
//!
//! Speculative (`PREFETCH`) requests fill this cache but grant no permissions
//! to the requester.

/// Cache replacement policy implementations (LRU, FIFO, Random).
pub mod policies;

use tracing::trace;

use self::policies::{ReplacementPolicy, policy_for};
use crate::common::{AccessKind, CoherenceState, LineAddr, ReqFlags};
use crate::config::CacheConfig;
use crate::soc::traits::{InvReq, MemObject, MemReq};
use crate::stats::{CacheStats, ComponentStats, NamedStats};

/// Cache line entry: which line is resident and with what permissions.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    line: LineAddr,
    state: CoherenceState,
}

/// Set-associative cache with a private parent memory object.
pub struct CacheSim {
    name: String,
    latency: u64,
    child_id: u32,
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    policy: Box<dyn ReplacementPolicy>,
    parent: Box<dyn MemObject>,
    stats: CacheStats,
}

impl std::fmt::Debug for CacheSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSim")
            .field("name", &self.name)
            .field("sets", &self.num_sets)
            .field("ways", &self.ways)
            .field("parent", &self.parent.name())
            .finish_non_exhaustive()
    }
}

impl CacheSim {
    /// Creates a new cache.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in statistics.
    /// * `config` - Size, associativity, latency, and replacement policy.
    /// * `line_bytes` - Line size in bytes.
    /// * `child_id` - Index this cache presents to its parent.
    /// * `parent` - The next level of the hierarchy.
    pub fn new(
        name: impl Into<String>,
        config: &CacheConfig,
        line_bytes: u64,
        child_id: u32,
        parent: Box<dyn MemObject>,
    ) -> Self {
        let ways = config.ways.max(1);
        let num_sets = config.num_sets(line_bytes).max(1);
        Self {
            name: name.into(),
            latency: config.latency,
            child_id,
            lines: vec![CacheLine::default(); num_sets * ways],
            num_sets,
            ways,
            policy: policy_for(config.policy, num_sets, ways),
            parent,
            stats: CacheStats::default(),
        }
    }

    /// Hit/miss counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Access latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Returns the permissions held for `line` (`Invalid` if absent).
    pub fn state_of(&self, line: LineAddr) -> CoherenceState {
        self.lookup(line)
            .map_or(CoherenceState::Invalid, |idx| self.lines[idx].state)
    }

    /// Drops every resident line (context switch to no thread).
    pub fn context_switch(&mut self) {
        for line in &mut self.lines {
            if line.state.is_valid() {
                line.state = CoherenceState::Invalid;
                self.stats.invalidations += 1;
            }
        }
    }

    #[inline(always)]
    const fn set_of(&self, line: LineAddr) -> usize {
        (line.val() % self.num_sets as u64) as usize
    }

    fn lookup(&self, line: LineAddr) -> Option<usize> {
        let base = self.set_of(line) * self.ways;
        (base..base + self.ways)
            .find(|&idx| self.lines[idx].state.is_valid() && self.lines[idx].line == line)
    }

    /// Picks a way for `req.line_addr`, writing back a dirty victim.
    fn allocate(&mut self, req: &MemReq) -> usize {
        let set = self.set_of(req.line_addr);
        let base = set * self.ways;
        let way = (0..self.ways)
            .find(|&w| !self.lines[base + w].state.is_valid())
            .unwrap_or_else(|| self.policy.victim(set));

        let victim = self.lines[base + way];
        if victim.state == CoherenceState::Modified {
            let mut wb = MemReq {
                child_id: self.child_id,
                state: CoherenceState::Modified,
                ..MemReq::new(victim.line, AccessKind::Putx, req.cycle, req.src_id)
            };
            let _ = self.parent.access(&mut wb);
            self.stats.writebacks += 1;
            trace!(cache = %self.name, line = %victim.line, "dirty writeback");
        }
        base + way
    }

    fn grant(req: &MemReq, held: CoherenceState) -> CoherenceState {
        if req.is_prefetch() {
            return CoherenceState::Invalid;
        }
        match req.kind {
            AccessKind::Getx => CoherenceState::Modified,
            AccessKind::Gets | AccessKind::Putx => match held {
                CoherenceState::Exclusive | CoherenceState::Modified => CoherenceState::Exclusive,
                CoherenceState::Shared | CoherenceState::Invalid => CoherenceState::Shared,
            },
        }
    }
}

impl MemObject for CacheSim {
    fn access(&mut self, req: &mut MemReq) -> u64 {
        let set = self.set_of(req.line_addr);
        let found = self.lookup(req.line_addr);

        if req.kind == AccessKind::Putx {
            return if let Some(idx) = found {
                self.lines[idx].state = CoherenceState::Modified;
                self.policy.touch(set, idx % self.ways);
                req.state = CoherenceState::Invalid;
                req.cycle + self.latency
            } else {
                self.parent.access(req)
            };
        }

        let hit = found.filter(|&idx| {
            req.kind == AccessKind::Gets
                || matches!(
                    self.lines[idx].state,
                    CoherenceState::Exclusive | CoherenceState::Modified
                )
        });

        if let Some(idx) = hit {
            self.stats.hits += 1;
            self.policy.touch(set, idx % self.ways);
            if req.kind == AccessKind::Getx {
                self.lines[idx].state = CoherenceState::Modified;
            }
            req.state = Self::grant(req, self.lines[idx].state);
            return req.cycle + self.latency;
        }

        self.stats.misses += 1;
        let idx = found.unwrap_or_else(|| self.allocate(req));
        let mut fetch = MemReq {
            line_addr: req.line_addr,
            kind: req.kind,
            child_id: self.child_id,
            state: self.lines[idx].state,
            cycle: req.cycle + self.latency,
            src_id: req.src_id,
            flags: req.flags.without(ReqFlags::PREFETCH),
        };
        let resp = self.parent.access(&mut fetch);

        let installed = match (req.kind, fetch.state) {
            (AccessKind::Getx, _) => CoherenceState::Modified,
            (_, CoherenceState::Invalid) => CoherenceState::Shared,
            (_, state) => state,
        };
        self.lines[idx] = CacheLine {
            line: req.line_addr,
            state: installed,
        };
        if found.is_some() {
            self.policy.touch(set, idx % self.ways);
        } else {
            self.policy.fill(set, idx % self.ways);
        }
        req.state = Self::grant(req, installed);
        resp
    }

    fn invalidate(&mut self, req: &InvReq) -> u64 {
        if let Some(idx) = self.lookup(req.line_addr) {
            self.lines[idx].state = CoherenceState::Invalid;
            self.stats.invalidations += 1;
        }
        req.cycle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn collect_stats(&self, out: &mut Vec<NamedStats>) {
        out.push(NamedStats {
            name: self.name.clone(),
            stats: ComponentStats::Cache(self.stats.clone()),
        });
        self.parent.collect_stats(out);
    }
}
