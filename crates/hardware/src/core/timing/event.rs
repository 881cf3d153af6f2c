//! Timing event nodes.
//!
//! Every access that participates in contention attribution mirrors its
//! scalar cycle arithmetic as a small DAG of nodes: "parent must complete
//! before child starts". The DAG lives in an index-addressed arena so that
//! components hold plain `EventId` handles instead of shared pointers.
//!
//! The arena implements:
//! 1. **Construction:** Delay, dummy (zero-delay join point), and bank-bound resource nodes.
//! 2. **Attachment:** `add_child` is only legal while the parent can still accept a child.
//! 3. **Detachment:** Held nodes are released explicitly; transient nodes are reclaimed after replay.
//! 4. **Replay:** Processes ready nodes in start-cycle order, serializing resource nodes per bank.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

/// Handle of a node in an `EventArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u32);

impl EventId {
    /// Raw arena index.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node models once all its parents are done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Completes a fixed number of cycles after it starts.
    Delay(u64),
    /// Zero-delay join point.
    Dummy,
    /// Occupies one memory bank for `occupancy` cycles.
    Resource {
        /// Bank index (reduced modulo the arena's bank count).
        bank: usize,
        /// Cycles the bank stays busy.
        occupancy: u64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeState {
    Pending,
    Done(u64),
    Freed,
}

#[derive(Debug)]
struct EventNode {
    kind: EventKind,
    min_start: u64,
    ready_at: u64,
    pending_parents: u32,
    children: Vec<EventId>,
    state: NodeState,
    free_on_done: bool,
}

/// Arena of timing event nodes for one requester.
#[derive(Debug)]
pub struct EventArena {
    nodes: Vec<EventNode>,
    free: Vec<EventId>,
    bank_busy: Vec<u64>,
    live: usize,
}

impl EventArena {
    /// Creates an empty arena with `banks` contended memory banks.
    pub fn new(banks: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            bank_busy: vec![0; banks.max(1)],
            live: 0,
        }
    }

    fn alloc(&mut self, kind: EventKind, min_start: u64, free_on_done: bool) -> EventId {
        let node = EventNode {
            kind,
            min_start,
            ready_at: 0,
            pending_parents: 0,
            children: Vec::new(),
            state: NodeState::Pending,
            free_on_done,
        };
        self.live += 1;
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            id
        } else {
            let id = EventId(self.nodes.len() as u32);
            self.nodes.push(node);
            id
        }
    }

    /// Creates a transient node, reclaimed by the first replay that completes it.
    pub fn add(&mut self, kind: EventKind, min_start: u64) -> EventId {
        self.alloc(kind, min_start, true)
    }

    /// Creates a held node; its owner must `release` or `free` it.
    pub fn add_held(&mut self, kind: EventKind, min_start: u64) -> EventId {
        self.alloc(kind, min_start, false)
    }

    /// Makes `child` wait for `parent`. Returns `child` for chaining.
    ///
    /// The parent must still accept children (see `can_add_child`).
    pub fn add_child(&mut self, parent: EventId, child: EventId) -> EventId {
        assert!(
            self.can_add_child(parent),
            "event {parent:?} cannot accept a child"
        );
        assert!(
            self.nodes[child.index()].state == NodeState::Pending,
            "child event {child:?} is not pending"
        );
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].pending_parents += 1;
        child
    }

    /// Creates a transient node as a child of `parent`.
    pub fn chain(&mut self, parent: EventId, kind: EventKind) -> EventId {
        let child = self.add(kind, 0);
        self.add_child(parent, child)
    }

    /// Creates a held node as a child of `parent`.
    pub fn chain_held(&mut self, parent: EventId, kind: EventKind) -> EventId {
        let child = self.add_held(kind, 0);
        self.add_child(parent, child)
    }

    /// Returns `true` while the node has not completed.
    pub fn can_add_child(&self, id: EventId) -> bool {
        self.nodes[id.index()].state == NodeState::Pending
    }

    /// Returns the completion cycle of a replayed node.
    pub fn done_cycle(&self, id: EventId) -> Option<u64> {
        match self.nodes[id.index()].state {
            NodeState::Done(cycle) => Some(cycle),
            NodeState::Pending | NodeState::Freed => None,
        }
    }

    /// Returns `true` once the node has completed in a replay.
    pub fn is_done(&self, id: EventId) -> bool {
        self.done_cycle(id).is_some()
    }

    /// Marks a pending node for reclamation once it completes.
    pub fn set_free_on_done(&mut self, id: EventId) {
        let node = &mut self.nodes[id.index()];
        assert!(
            node.state == NodeState::Pending,
            "event {id:?} is not pending"
        );
        node.free_on_done = true;
    }

    /// Frees a completed node.
    pub fn free(&mut self, id: EventId) {
        let node = &mut self.nodes[id.index()];
        assert!(
            matches!(node.state, NodeState::Done(_)),
            "freeing event {id:?} that has not completed"
        );
        node.state = NodeState::Freed;
        node.children.clear();
        self.free.push(id);
        self.live -= 1;
    }

    /// Detaches the owner from a held node: frees it if completed, otherwise
    /// lets the next replay reclaim it.
    pub fn release(&mut self, id: EventId) {
        if self.can_add_child(id) {
            self.set_free_on_done(id);
        } else {
            self.free(id);
        }
    }

    /// Number of nodes not yet freed.
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Number of pending nodes.
    pub fn pending(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.state == NodeState::Pending)
            .count()
    }

    /// Replays every pending node, returning how many completed.
    ///
    /// Ready nodes are processed in ascending start-cycle order (ties by
    /// handle). A node starts at `max(min_start, latest parent completion)`;
    /// resource nodes additionally wait for their bank. Transient nodes are
    /// reclaimed once complete; held nodes stay until their owner frees them.
    pub fn replay(&mut self) -> usize {
        let mut ready: BinaryHeap<Reverse<(u64, EventId)>> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.state == NodeState::Pending && n.pending_parents == 0)
            .map(|(i, n)| Reverse((n.min_start.max(n.ready_at), EventId(i as u32))))
            .collect();

        let banks = self.bank_busy.len();
        let mut completed = 0;
        let mut reclaim = Vec::new();
        while let Some(Reverse((start, id))) = ready.pop() {
            let kind = self.nodes[id.index()].kind;
            let done = match kind {
                EventKind::Delay(delay) => start + delay,
                EventKind::Dummy => start,
                EventKind::Resource { bank, occupancy } => {
                    let busy = &mut self.bank_busy[bank % banks];
                    let begin = start.max(*busy);
                    *busy = begin + occupancy;
                    begin + occupancy
                }
            };

            let node = &mut self.nodes[id.index()];
            node.state = NodeState::Done(done);
            let children = std::mem::take(&mut node.children);
            if node.free_on_done {
                reclaim.push(id);
            }
            completed += 1;

            for child in children {
                let c = &mut self.nodes[child.index()];
                c.ready_at = c.ready_at.max(done);
                c.pending_parents -= 1;
                if c.pending_parents == 0 {
                    ready.push(Reverse((c.min_start.max(c.ready_at), child)));
                }
            }
        }

        for id in reclaim {
            self.free(id);
        }
        trace!(completed, live = self.live, "event replay");
        completed
    }
}
