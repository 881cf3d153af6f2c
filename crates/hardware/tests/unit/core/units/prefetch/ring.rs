//! Destination Ring Tests.

use graphsim_core::core::timing::{EventArena, EventKind};
use graphsim_core::core::units::prefetch::graph::{DestField, DestSlot, DestinationRing};

fn slot(arena: &mut EventArena, base: u64) -> DestSlot {
    let events = [
        arena.add_held(EventKind::Dummy, 0),
        arena.add_held(EventKind::Dummy, 0),
        arena.add_held(EventKind::Dummy, 0),
    ];
    DestSlot::launched([base, base + 1, base + 50], events)
}

/// A new ring is all free and serves from slot 0.
#[test]
fn new_ring_is_free() {
    let ring = DestinationRing::new(4);
    assert_eq!(ring.capacity(), 4);
    assert_eq!((ring.start(), ring.end()), (0, 0));
    assert!(ring.has_free_slot());
    assert!(ring.front().is_free());
    assert_eq!(ring.occupied(), 0);
}

/// Zero capacity still yields one slot.
#[test]
fn capacity_is_at_least_one() {
    assert_eq!(DestinationRing::new(0).capacity(), 1);
}

/// Pushing fills at the end pointer and wraps around.
#[test]
fn push_wraps_end_pointer() {
    let mut arena = EventArena::new(1);
    let mut ring = DestinationRing::new(2);
    ring.push(slot(&mut arena, 100));
    ring.push(slot(&mut arena, 200));

    assert_eq!(ring.end(), 0);
    assert!(!ring.has_free_slot());
    assert_eq!(ring.occupied(), 2);
    assert_eq!(ring.slot(1).ready_cycle(DestField::Node), 200);
}

/// Each field is consumed once; the slot frees when all three are read.
#[test]
fn take_clears_ready_bits() {
    let mut arena = EventArena::new(1);
    let mut s = slot(&mut arena, 10);
    assert_eq!(s.ready_bits().count_ones(), 3);

    let (cycle, ev) = s.take(DestField::Weight);
    assert_eq!(cycle, 11);
    assert!(ev.is_some());
    assert!(!s.is_free());

    let _ = s.take(DestField::Node);
    let (cycle, _) = s.take(DestField::Property);
    assert_eq!(cycle, 60);
    assert!(s.is_free());
}

/// Reading a field twice is a protocol error.
#[test]
#[should_panic(expected = "read twice")]
fn take_twice_panics() {
    let mut arena = EventArena::new(1);
    let mut s = slot(&mut arena, 10);
    let _ = s.take(DestField::Node);
    let _ = s.take(DestField::Node);
}

/// Overfilling the ring is a protocol error.
#[test]
#[should_panic(expected = "overflow")]
fn push_into_full_ring_panics() {
    let mut arena = EventArena::new(1);
    let mut ring = DestinationRing::new(1);
    ring.push(slot(&mut arena, 0));
    ring.push(slot(&mut arena, 0));
}

/// Retiring the front slot moves the start pointer around the ring.
#[test]
fn advance_start_wraps() {
    let mut ring = DestinationRing::new(3);
    for _ in 0..4 {
        ring.advance_start();
    }
    assert_eq!(ring.start(), 1);
}
