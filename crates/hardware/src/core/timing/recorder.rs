//! Per-requester event recorder.
//!
//! A memory object that builds timing events for an access leaves a single
//! `TimingRecord` in the requester's recorder; whoever issued the access pops
//! it and splices the record's start/end nodes into its own subgraph.

use super::event::{EventArena, EventId};
use crate::common::{AccessKind, LineAddr};

/// Timing events of one completed access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingRecord {
    /// Line that was accessed.
    pub addr: LineAddr,
    /// Cycle the request was issued.
    pub req_cycle: u64,
    /// Cycle the response was returned.
    pub resp_cycle: u64,
    /// Request kind.
    pub kind: AccessKind,
    /// First node of the access subgraph.
    pub start: EventId,
    /// Completion node of the access subgraph (held by whoever pops the record).
    pub end: EventId,
}

/// Event arena plus at most one outstanding record.
#[derive(Debug)]
pub struct EventRecorder {
    arena: EventArena,
    record: Option<TimingRecord>,
}

impl EventRecorder {
    /// Creates a recorder whose arena contends for `banks` memory banks.
    pub fn new(banks: usize) -> Self {
        Self {
            arena: EventArena::new(banks),
            record: None,
        }
    }

    /// Shared access to the arena.
    pub const fn arena(&self) -> &EventArena {
        &self.arena
    }

    /// Mutable access to the arena.
    pub fn arena_mut(&mut self) -> &mut EventArena {
        &mut self.arena
    }

    /// Returns `true` if a record is outstanding.
    pub const fn has_record(&self) -> bool {
        self.record.is_some()
    }

    /// Leaves a record for the requester.
    ///
    /// There must be no outstanding record.
    pub fn push_record(&mut self, record: TimingRecord) {
        assert!(
            self.record.is_none(),
            "pushing a timing record for {} while one is outstanding",
            record.addr
        );
        self.record = Some(record);
    }

    /// Takes the outstanding record, if any.
    pub fn pop_record(&mut self) -> Option<TimingRecord> {
        self.record.take()
    }
}
