//! Stream Prefetcher.
//!
//! A stride prefetcher that sits between two memory levels and tracks accesses
//! per 64-line region (4 KiB with 64-byte lines). Each tracked region keeps:
//! 1. **Stride detection:** The dominant stride and a saturating confidence counter.
//! 2. **Prefetch state:** A valid bit and (issue, response) cycles per line in the region.
//! 3. **Replacement:** An LRU timestamp; regions with recent in-flight activity are not replaced.
//!
//! Once confident, each access whose stride matches prefetches one line ahead
//! of the previous prefetch; a demand that catches a prefetch still in flight
//! (a short hit) triggers one extra, deeper prefetch.

use std::sync::Arc;

use tracing::trace;

use super::sat_counter::SatCounter;
use crate::common::constants::STREAM_REGION_LINES;
use crate::common::{AccessKind, LineAddr, ReqFlags};
use crate::config::StreamPrefetcherConfig;
use crate::core::timing::TimingRecord;
use crate::sim::SimContext;
use crate::soc::traits::{InvReq, MemObject, MemReq};
use crate::stats::{ComponentStats, NamedStats, StreamPrefetcherStats};

const REGION_LINES: i32 = STREAM_REGION_LINES as i32;

#[derive(Clone, Copy, Debug, Default)]
struct AccessTimes {
    start: u64,
    resp: u64,
}

/// Prediction state of one tracked region.
#[derive(Clone, Debug)]
struct StreamEntry {
    tag: Option<u64>,
    stride: i32,
    conf: SatCounter,
    times: [AccessTimes; STREAM_REGION_LINES as usize],
    valid: u64,
    last_pos: i32,
    last_last_pos: i32,
    last_prefetch_pos: i32,
    last_cycle: u64,
    ts: u64,
}

impl StreamEntry {
    fn new(conf: SatCounter) -> Self {
        Self {
            tag: None,
            stride: 1,
            conf,
            times: [AccessTimes::default(); STREAM_REGION_LINES as usize],
            valid: 0,
            last_pos: 0,
            last_last_pos: 0,
            last_prefetch_pos: 0,
            last_cycle: 0,
            ts: 0,
        }
    }

    /// Takes over the entry for `tag`, forgetting everything about the old region.
    fn alloc(&mut self, tag: u64, pos: i32, cycle: u64, ts: u64) {
        self.tag = Some(tag);
        self.stride = 1;
        self.conf.reset();
        self.valid = 0;
        self.last_pos = pos;
        self.last_last_pos = 0;
        self.last_prefetch_pos = 0;
        self.last_cycle = cycle;
        self.ts = ts;
    }

    #[inline]
    const fn is_valid(&self, pos: i32) -> bool {
        self.valid & (1 << pos) != 0
    }

    #[inline]
    const fn set_valid(&mut self, pos: i32, valid: bool) {
        if valid {
            self.valid |= 1 << pos;
        } else {
            self.valid &= !(1 << pos);
        }
    }
}

/// Region-based stride prefetcher in front of a parent memory object.
pub struct StreamPrefetcher {
    name: String,
    ctx: Arc<SimContext>,
    parent: Box<dyn MemObject>,
    entries: Vec<StreamEntry>,
    timestamp: u64,
    warm_window: u64,
    max_fetch_depth: i32,
    stats: StreamPrefetcherStats,
}

impl std::fmt::Debug for StreamPrefetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamPrefetcher")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .field("parent", &self.parent.name())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl StreamPrefetcher {
    /// Creates a prefetcher forwarding to `parent`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in statistics.
    /// * `cfg` - Table size, confidence bounds, warm window, and fetch depth.
    /// * `ctx` - Simulation context (event recorders of the requesting cores).
    /// * `parent` - The next level of the hierarchy.
    pub fn new(
        name: impl Into<String>,
        cfg: &StreamPrefetcherConfig,
        ctx: Arc<SimContext>,
        parent: Box<dyn MemObject>,
    ) -> Self {
        let conf = SatCounter::from_config(cfg);
        Self {
            name: name.into(),
            ctx,
            parent,
            entries: vec![StreamEntry::new(conf); cfg.entries.max(1)],
            timestamp: 0,
            warm_window: cfg.warm_window,
            max_fetch_depth: cfg.max_fetch_depth as i32,
            stats: StreamPrefetcherStats::default(),
        }
    }

    /// Prefetch counters.
    pub const fn stats(&self) -> &StreamPrefetcherStats {
        &self.stats
    }

    /// Returns `true` if `line` was prefetched and not yet consumed.
    pub fn is_prefetched(&self, line: LineAddr) -> bool {
        self.prefetch_times(line).is_some()
    }

    /// Issue and ready cycles of an unconsumed prefetch of `line`.
    pub fn prefetch_times(&self, line: LineAddr) -> Option<(u64, u64)> {
        let pos = line.position() as i32;
        self.find(line.region())
            .map(|idx| &self.entries[idx])
            .filter(|e| e.is_valid(pos))
            .map(|e| {
                let t = e.times[pos as usize];
                (t.start, t.resp)
            })
    }

    /// Current confidence of the region containing `line`, if tracked.
    pub fn confidence(&self, line: LineAddr) -> Option<u32> {
        self.find(line.region())
            .map(|idx| self.entries[idx].conf.value())
    }

    fn find(&self, tag: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == Some(tag))
    }

    /// Least recently used entry that is not warm, if any.
    fn victim(&self, cycle: u64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.last_cycle <= cycle + self.warm_window)
            .min_by_key(|(_, e)| e.ts)
            .map(|(idx, _)| idx)
    }

    /// Issues a prefetch for position `pos` of entry `idx`.
    fn prefetch(&mut self, idx: usize, req: &MemReq, demand: Option<&TimingRecord>, pos: i32) {
        let cur = req.line_addr.position() as i32;
        let mut pf = MemReq {
            child_id: req.child_id,
            ..MemReq::new(
                req.line_addr.offset(i64::from(pos - cur)),
                AccessKind::Gets,
                req.cycle,
                req.src_id,
            )
        }
        .with_flags(ReqFlags::PREFETCH);
        let resp = self.parent.access(&mut pf);
        self.link_prefetch_record(req.src_id, demand);

        let entry = &mut self.entries[idx];
        entry.set_valid(pos, true);
        entry.times[pos as usize] = AccessTimes {
            start: req.cycle,
            resp,
        };
        self.stats.prefetches += 1;
        trace!(name = %self.name, line = %pf.line_addr, resp, "stream prefetch");
    }

    /// Hangs a prefetch's timing record off the demand access that triggered it.
    fn link_prefetch_record(&self, core: u32, demand: Option<&TimingRecord>) {
        let mut recorder = self.ctx.lock_recorder(core);
        let Some(rec) = recorder.pop_record() else {
            return;
        };
        let arena = recorder.arena_mut();
        if let Some(d) = demand.filter(|d| arena.can_add_child(d.start)) {
            let _ = arena.add_child(d.start, rec.start);
        }
        arena.release(rec.end);
    }

    /// Updates stride and confidence of entry `idx` after an access at `pos`,
    /// issuing prefetches when confident.
    fn train(
        &mut self,
        idx: usize,
        req: &MemReq,
        demand: Option<&TimingRecord>,
        pos: i32,
        short: bool,
    ) {
        let entry = &mut self.entries[idx];
        let stride = pos - entry.last_pos;

        if stride == entry.stride {
            entry.conf.inc();
            if entry.conf.pred() {
                let mut fetch_depth = (entry.last_prefetch_pos - entry.last_pos) / stride;
                let mut target = entry.last_prefetch_pos + stride;
                if fetch_depth < 1 {
                    target = pos + stride;
                    fetch_depth = 1;
                }

                if (0..REGION_LINES).contains(&target) {
                    if self.entries[idx].is_valid(target) {
                        self.stats.double_prefetches += 1;
                    } else {
                        self.prefetch(idx, req, demand, target);
                    }

                    let deeper = target + stride;
                    if short
                        && fetch_depth < self.max_fetch_depth
                        && (0..REGION_LINES).contains(&deeper)
                        && !self.entries[idx].is_valid(deeper)
                    {
                        self.prefetch(idx, req, demand, deeper);
                        target = deeper;
                    }
                }
                self.entries[idx].last_prefetch_pos = target;
            } else {
                self.stats.low_conf_accs += 1;
            }
        } else {
            entry.conf.dec();
            if !entry.conf.pred()
                && stride != 0
                && stride == entry.last_pos - entry.last_last_pos
            {
                entry.stride = stride;
                entry.conf.reset();
                self.stats.stride_switches += 1;
            }
            entry.last_prefetch_pos = pos;
        }

        let entry = &mut self.entries[idx];
        entry.last_last_pos = entry.last_pos;
        entry.last_pos = pos;
    }
}

impl MemObject for StreamPrefetcher {
    fn access(&mut self, req: &mut MemReq) -> u64 {
        let mut resp = self.parent.access(req);
        if req.kind != AccessKind::Gets {
            return resp;
        }
        self.stats.accesses += 1;

        let demand = self.ctx.lock_recorder(req.src_id).pop_record();
        let tag = req.line_addr.region();
        let pos = req.line_addr.position() as i32;
        let req_cycle = req.cycle;

        if let Some(idx) = self.find(tag) {
            self.stats.page_hits += 1;
            self.timestamp += 1;
            self.entries[idx].ts = self.timestamp;

            let mut short = false;
            let entry = &mut self.entries[idx];
            if entry.is_valid(pos) {
                let pf_resp = entry.times[pos as usize].resp;
                short = pf_resp > resp;
                entry.set_valid(pos, false);
                resp = resp.max(pf_resp);
                entry.last_cycle = entry.last_cycle.max(resp);
                self.stats.hits += 1;
                if short {
                    self.stats.short_hits += 1;
                }
            }
            self.train(idx, req, demand.as_ref(), pos, short);
        } else if let Some(idx) = self.victim(req_cycle) {
            self.timestamp += 1;
            self.entries[idx].alloc(tag, pos, req_cycle, self.timestamp);
        }

        if let Some(rec) = demand {
            self.ctx.lock_recorder(req.src_id).push_record(rec);
        }
        resp
    }

    fn invalidate(&mut self, req: &InvReq) -> u64 {
        if let Some(idx) = self.find(req.line_addr.region()) {
            self.entries[idx].set_valid(req.line_addr.position() as i32, false);
        }
        req.cycle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn collect_stats(&self, out: &mut Vec<NamedStats>) {
        out.push(NamedStats {
            name: self.name.clone(),
            stats: ComponentStats::StreamPrefetcher(self.stats.clone()),
        });
        self.parent.collect_stats(out);
    }
}
