//! Graph Prefetcher load/store protocol.
//!
//! A `SrcNode` store starts a source-access phase: the source property and
//! the neighbor offset range are fetched, then destination-access phases
//! launch for every free ring slot. Each destination phase fetches the edge
//! and weight once the offsets are known, and the neighbor property once the
//! edge is known. Demand loads of `SrcProperty`/`DestNode`/`WeightValue`/
//! `DestProperty` return no earlier than the recorded ready cycle and consume
//! the field; draining a slot launches the next destination phase, keeping
//! the pipeline one slot ahead of demand.
//!
//! Every speculative access keeps two views of its completion in step: the
//! scalar ready cycle used inline, and a held completion event in the core's
//! event arena that the demand read later hangs its own end event from.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use super::descriptor::{DestinationDescriptor, SourceDescriptor};
use super::ring::{DestField, DestSlot, DestinationRing};
use super::{GraphField, GraphWindow};
use crate::common::{AccessKind, LineAddr, ReqFlags, SimError};
use crate::core::timing::{EventArena, EventId, EventKind, TimingRecord};
use crate::sim::SimContext;
use crate::soc::traits::{MemObject, MemReq};
use crate::stats::GraphPrefetcherStats;

/// State of the current source-access phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SourceEntry {
    property_avail: u64,
    offset_avail: u64,
    /// Completion of the property fetch; `None` once demand has read it.
    property_end: Option<EventId>,
    /// Completion of the offset fetch(es); `None` once released.
    offset_end: Option<EventId>,
}

/// Start and end nodes of a demand access's own timing record.
#[derive(Clone, Copy, Debug)]
struct DemandEvents {
    start: EventId,
    end: EventId,
}

/// Graph Prefetcher of one core.
pub struct GraphPrefetcher {
    name: String,
    core: u32,
    latency: u64,
    line_bits: u32,
    window: GraphWindow,
    ctx: Arc<SimContext>,
    parent: Box<dyn MemObject>,
    sources: VecDeque<SourceDescriptor>,
    destinations: VecDeque<DestinationDescriptor>,
    source: Option<SourceEntry>,
    ring: DestinationRing,
    stats: GraphPrefetcherStats,
}

impl std::fmt::Debug for GraphPrefetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphPrefetcher")
            .field("name", &self.name)
            .field("core", &self.core)
            .field("sources", &self.sources.len())
            .field("destinations", &self.destinations.len())
            .field("ring", &self.ring)
            .finish_non_exhaustive()
    }
}

impl GraphPrefetcher {
    /// Creates the Graph Prefetcher of `core`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in logs.
    /// * `core` - Requesting core; selects the event recorder.
    /// * `ctx` - Simulation context (window, ring capacity, latency, line size).
    /// * `parents` - Memory objects above the prefetcher; exactly one is required.
    ///
    /// # Errors
    ///
    /// `SimError::ParentCount` unless exactly one parent is given.
    pub fn new(
        name: impl Into<String>,
        core: u32,
        ctx: Arc<SimContext>,
        parents: Vec<Box<dyn MemObject>>,
    ) -> Result<Self, SimError> {
        let name = name.into();
        let got = parents.len();
        let Some(parent) = parents.into_iter().next().filter(|_| got == 1) else {
            return Err(SimError::ParentCount {
                component: name,
                got,
            });
        };

        let cfg = &ctx.config().graph_prefetcher;
        let (latency, entries) = (cfg.latency, cfg.entries);
        Ok(Self {
            name,
            core,
            latency,
            line_bits: ctx.line_bits(),
            window: ctx.graph_window(),
            ring: DestinationRing::new(entries),
            ctx,
            parent,
            sources: VecDeque::new(),
            destinations: VecDeque::new(),
            source: None,
            stats: GraphPrefetcherStats::default(),
        })
    }

    /// Queues a source descriptor.
    pub fn push_source(&mut self, desc: SourceDescriptor) {
        self.sources.push_back(desc);
    }

    /// Queues a destination descriptor.
    pub fn push_destination(&mut self, desc: DestinationDescriptor) {
        self.destinations.push_back(desc);
    }

    /// Counters.
    pub const fn stats(&self) -> &GraphPrefetcherStats {
        &self.stats
    }

    /// The destination ring.
    pub const fn ring(&self) -> &DestinationRing {
        &self.ring
    }

    /// Source descriptors not yet consumed.
    pub fn queued_sources(&self) -> usize {
        self.sources.len()
    }

    /// Destination descriptors not yet launched.
    pub fn queued_destinations(&self) -> usize {
        self.destinations.len()
    }

    /// Ready cycles of the current source entry: (property, offsets).
    pub fn source_ready(&self) -> Option<(u64, u64)> {
        self.source.map(|s| (s.property_avail, s.offset_avail))
    }

    /// Demand read of `field` at `cycle`; returns the completion cycle.
    ///
    /// # Panics
    ///
    /// On fields that cannot be loaded, on a second read of the same field,
    /// on a source-property read with no outstanding source entry, and on a
    /// destination read with an empty ring and no queued destinations.
    pub fn load(&mut self, field: GraphField, cycle: u64) -> u64 {
        let mut resp = cycle + self.latency;
        let demand = self.demand_events(cycle);

        match field {
            GraphField::UpdatesSize => {}
            GraphField::SrcProperty => {
                let entry = self.source.as_mut().filter(|s| s.property_end.is_some());
                let Some(entry) = entry else {
                    panic!(
                        "[{}] source property read with no outstanding source entry",
                        self.name
                    );
                };
                resp = resp.max(entry.property_avail);
                let completion = entry.property_end.take();
                self.attach_demand(completion, demand.end);
            }
            GraphField::DestNode | GraphField::WeightValue | GraphField::DestProperty => {
                if self.ring.front().is_free() {
                    assert!(
                        !self.destinations.is_empty(),
                        "[{}] destination read with an empty ring and no queued destinations",
                        self.name
                    );
                    self.launch_destination(cycle, demand.start);
                }
                let dest = field.dest_field().unwrap_or(DestField::Node);
                let (ready, completion) = self.ring.front_mut().take(dest);
                resp = resp.max(ready);
                self.attach_demand(completion, demand.end);
            }
            _ => panic!("[{}] invalid load field {field:?}", self.name),
        }

        if self.ring.front().is_free() {
            if field.dest_field().is_some() {
                self.ring.advance_start();
                self.stats.slots_drained += 1;
                trace!(name = %self.name, start = self.ring.start(), "destination slot drained");
            }
            if self.destinations.is_empty() {
                self.release_offsets();
            } else {
                self.launch_destination(cycle, demand.start);
            }
        }

        self.push_demand_record(field, cycle, resp, AccessKind::Gets, demand);
        self.stats.loads += 1;
        resp
    }

    /// Store to `field` at `cycle`; returns the completion cycle.
    ///
    /// # Panics
    ///
    /// On fields that cannot be stored, and on a `SrcNode` store with no
    /// queued source descriptor.
    pub fn store(&mut self, field: GraphField, cycle: u64) -> u64 {
        let resp = cycle + self.latency;
        let demand = self.demand_events(cycle);

        match field {
            GraphField::Offset | GraphField::Edge | GraphField::Weight | GraphField::Property => {}
            GraphField::SrcNode => {
                self.source_access(cycle, demand.start);
                while !self.destinations.is_empty() && self.ring.has_free_slot() {
                    self.launch_destination(cycle, demand.start);
                }
            }
            _ => panic!("[{}] invalid store field {field:?}", self.name),
        }

        self.push_demand_record(field, cycle, resp, AccessKind::Putx, demand);
        self.stats.stores += 1;
        resp
    }

    fn with_events<R>(&self, f: impl FnOnce(&mut EventArena) -> R) -> R {
        let mut recorder = self.ctx.lock_recorder(self.core);
        f(recorder.arena_mut())
    }

    /// start → latency → end, the demand access's own subgraph.
    fn demand_events(&self, cycle: u64) -> DemandEvents {
        let latency = self.latency;
        self.with_events(|arena| {
            let start = arena.add(EventKind::Dummy, cycle);
            let delay = arena.chain(start, EventKind::Delay(latency));
            let end = arena.chain_held(delay, EventKind::Dummy);
            DemandEvents { start, end }
        })
    }

    fn push_demand_record(
        &self,
        field: GraphField,
        cycle: u64,
        resp: u64,
        kind: AccessKind,
        demand: DemandEvents,
    ) {
        let record = TimingRecord {
            addr: LineAddr::from_byte(self.window.addr_of(field), self.line_bits),
            req_cycle: cycle,
            resp_cycle: resp,
            kind,
            start: demand.start,
            end: demand.end,
        };
        self.ctx.lock_recorder(self.core).push_record(record);
    }

    /// Hangs a demand read's end event off a speculative completion event.
    fn attach_demand(&self, completion: Option<EventId>, end: EventId) {
        let Some(completion) = completion else {
            panic!("[{}] prefetched field has no completion event", self.name);
        };
        self.with_events(|arena| {
            if arena.can_add_child(completion) {
                arena.set_free_on_done(completion);
                let _ = arena.add_child(completion, end);
            } else {
                assert!(arena.is_done(completion));
                arena.free(completion);
            }
        });
    }

    /// Releases the source entry's offset completion once no destination
    /// phase can chain from it any more.
    fn release_offsets(&mut self) {
        if let Some(ev) = self.source.as_mut().and_then(|s| s.offset_end.take()) {
            self.with_events(|arena| arena.release(ev));
        }
    }

    /// Issues one speculative read and mirrors it in the event graph.
    ///
    /// A delay of `resp - req_cycle` from `anchor` leads to `end`; if the
    /// hierarchy left a timing record, its subgraph is spliced in between.
    fn speculate(&mut self, addr: u64, req_cycle: u64, anchor: EventId, end: EventId) -> u64 {
        let line = LineAddr::from_byte(addr, self.line_bits);
        let mut req = MemReq::new(line, AccessKind::Gets, req_cycle, self.core)
            .with_flags(ReqFlags::PREFETCH);
        let resp = self.parent.access(&mut req);
        self.stats.speculative_accesses += 1;
        trace!(name = %self.name, %line, req_cycle, resp, "speculative access");

        let mut recorder = self.ctx.lock_recorder(self.core);
        let record = recorder.pop_record();
        let arena = recorder.arena_mut();
        if let Some(rec) = record {
            assert!(
                rec.req_cycle >= req_cycle,
                "timing record issued at {} precedes request cycle {req_cycle}",
                rec.req_cycle
            );
            let gap = arena.chain(anchor, EventKind::Delay(rec.req_cycle - req_cycle));
            let _ = arena.add_child(gap, rec.start);
            let _ = arena.add_child(rec.end, end);
            arena.release(rec.end);
        }
        let span = arena.chain(anchor, EventKind::Delay(resp.saturating_sub(req_cycle)));
        let _ = arena.add_child(span, end);
        resp
    }

    /// Source-access phase: property, then the offset range (one or two lines).
    fn source_access(&mut self, cycle: u64, anchor: EventId) {
        let Some(desc) = self.sources.pop_front() else {
            panic!("[{}] SrcNode store with no queued source descriptor", self.name);
        };
        // The previous entry is replaced whether or not demand read its property.
        if let Some(old) = self.source.take() {
            self.with_events(|arena| {
                for ev in [old.property_end, old.offset_end].into_iter().flatten() {
                    arena.release(ev);
                }
            });
        }

        let (property_end, offset_end) = self.with_events(|arena| {
            (
                arena.add_held(EventKind::Dummy, 0),
                arena.add_held(EventKind::Dummy, 0),
            )
        });

        let property_avail = self.speculate(desc.property, cycle, anchor, property_end);
        let mut offset_avail = self.speculate(desc.offset_start, cycle, anchor, offset_end);
        let first = LineAddr::from_byte(desc.offset_start, self.line_bits);
        let last = LineAddr::from_byte(desc.offset_end, self.line_bits);
        if first != last {
            offset_avail = offset_avail.max(self.speculate(desc.offset_end, cycle, anchor, offset_end));
        }

        self.source = Some(SourceEntry {
            property_avail,
            offset_avail,
            property_end: Some(property_end),
            offset_end: Some(offset_end),
        });
        self.stats.source_phases += 1;
        debug!(
            name = %self.name,
            cycle,
            property_avail,
            offset_avail,
            neighbors = desc.neighbors,
            "source phase"
        );
    }

    /// Destination-access phase into the slot at the ring's end pointer.
    fn launch_destination(&mut self, cycle: u64, anchor: EventId) {
        let Some(desc) = self.destinations.pop_front() else {
            panic!("[{}] destination phase with no queued destination", self.name);
        };
        let offset_avail = self.source.map_or(0, |s| s.offset_avail);
        let offset_end = self.source.and_then(|s| s.offset_end);

        // Edge and weight addresses resolve once the offsets are known.
        let edge_req = cycle.max(offset_avail);
        let weight_req = edge_req + 1;
        let (edge_anchor, weight_anchor, edge_end, weight_end, property_end) =
            self.with_events(|arena| {
                let issue = |arena: &mut EventArena, at: u64| {
                    let ev = arena.chain(anchor, EventKind::Delay(at - cycle));
                    if let Some(off) = offset_end.filter(|&off| arena.can_add_child(off)) {
                        let _ = arena.add_child(off, ev);
                    }
                    ev
                };
                let edge_anchor = issue(arena, edge_req);
                let weight_anchor = issue(arena, weight_req);
                (
                    edge_anchor,
                    weight_anchor,
                    arena.add_held(EventKind::Dummy, 0),
                    arena.add_held(EventKind::Dummy, 0),
                    arena.add_held(EventKind::Dummy, 0),
                )
            });

        let edge_resp = self.speculate(desc.edge, edge_req, edge_anchor, edge_end);
        let weight_resp = self.speculate(desc.weight, weight_req, weight_anchor, weight_end);
        // The neighbor's property address is only known once the edge arrives.
        let property_resp = self.speculate(desc.property, edge_resp, edge_end, property_end);

        self.ring.push(DestSlot::launched(
            [edge_resp, weight_resp, property_resp],
            [edge_end, weight_end, property_end],
        ));
        self.stats.destination_phases += 1;
        trace!(
            name = %self.name,
            end = self.ring.end(),
            edge_resp,
            weight_resp,
            property_resp,
            "destination phase"
        );
    }
}
