//! Destination slot ring buffer.
//!
//! Fixed-capacity circular buffer of in-flight destination fetches. Slots are
//! filled at the end pointer when a destination-access phase launches and
//! retired at the start pointer once demand reads have cleared all three
//! readiness bits. A slot with no readiness bits set is free.

use crate::common::constants::{
    DEST_NODE_BIT, DEST_PROPERTY_BIT, DEST_READY_MASK, WEIGHT_VALUE_BIT,
};
use crate::core::timing::EventId;

/// One of the three prefetched fields of a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestField {
    /// Edge value (neighbor id).
    Node,
    /// Edge weight.
    Weight,
    /// Neighbor property.
    Property,
}

impl DestField {
    /// Readiness bit of the field.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Node => DEST_NODE_BIT,
            Self::Weight => WEIGHT_VALUE_BIT,
            Self::Property => DEST_PROPERTY_BIT,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Node => 0,
            Self::Weight => 1,
            Self::Property => 2,
        }
    }
}

/// Prefetch state of one destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DestSlot {
    ready: u8,
    cycles: [u64; 3],
    events: [Option<EventId>; 3],
}

impl DestSlot {
    /// A freshly launched slot: all fields ready at the given cycles.
    pub const fn launched(cycles: [u64; 3], events: [EventId; 3]) -> Self {
        Self {
            ready: DEST_READY_MASK,
            cycles,
            events: [Some(events[0]), Some(events[1]), Some(events[2])],
        }
    }

    /// Readiness bitmask.
    pub const fn ready_bits(&self) -> u8 {
        self.ready
    }

    /// Returns `true` when no field is left to read.
    pub const fn is_free(&self) -> bool {
        self.ready == 0
    }

    /// Cycle at which `field` was (or will be) delivered.
    pub const fn ready_cycle(&self, field: DestField) -> u64 {
        self.cycles[field.index()]
    }

    /// Consumes `field`: clears its readiness bit and hands over its completion event.
    ///
    /// The bit must be set; a field is never read twice.
    pub fn take(&mut self, field: DestField) -> (u64, Option<EventId>) {
        assert!(
            self.ready & field.bit() != 0,
            "destination field {field:?} read twice (ready bits {:#05b})",
            self.ready
        );
        self.ready &= !field.bit();
        let i = field.index();
        (self.cycles[i], self.events[i].take())
    }
}

/// Circular buffer of destination slots.
#[derive(Clone, Debug)]
pub struct DestinationRing {
    slots: Vec<DestSlot>,
    start: usize,
    end: usize,
}

impl DestinationRing {
    /// Creates a ring of `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![DestSlot::default(); capacity.max(1)],
            start: 0,
            end: 0,
        }
    }

    /// Number of slots.
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the oldest slot demand reads are served from.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Index of the next slot to fill.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Slot at `idx`.
    pub fn slot(&self, idx: usize) -> &DestSlot {
        &self.slots[idx]
    }

    /// The oldest slot.
    pub fn front(&self) -> &DestSlot {
        &self.slots[self.start]
    }

    /// The oldest slot, mutably.
    pub fn front_mut(&mut self) -> &mut DestSlot {
        &mut self.slots[self.start]
    }

    /// Returns `true` if the slot at the end pointer can take a new destination.
    pub fn has_free_slot(&self) -> bool {
        self.slots[self.end].is_free()
    }

    /// Slots holding unread fields.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    /// Fills the slot at the end pointer and advances it.
    pub fn push(&mut self, slot: DestSlot) {
        assert!(
            self.has_free_slot(),
            "destination ring overflow at slot {}",
            self.end
        );
        self.slots[self.end] = slot;
        self.end = (self.end + 1) % self.slots.len();
    }

    /// Retires the oldest slot.
    pub fn advance_start(&mut self) {
        self.start = (self.start + 1) % self.slots.len();
    }
}
