//! Contention Recorder Tests.
//!
//! Accesses are chained in issue order; at the end of a phase the chain is
//! replayed and any slip of the last access past its recorded response is
//! charged as contention.

use graphsim_core::common::{AccessKind, LineAddr};
use graphsim_core::core::timing::{ContentionRecorder, EventKind, EventRecorder, TimingRecord};
use std::sync::{Arc, Mutex};

/// Leaves a main-memory style record: start → bank occupancy → rest of latency.
fn push_access(recorder: &Arc<Mutex<EventRecorder>>, req: u64, latency: u64, bank: usize) {
    let mut guard = recorder.lock().unwrap();
    let arena = guard.arena_mut();
    let start = arena.add(EventKind::Dummy, req);
    let busy = arena.chain(start, EventKind::Resource { bank, occupancy: 4 });
    let end = arena.chain_held(busy, EventKind::Delay(latency - 4));
    guard.push_record(TimingRecord {
        addr: LineAddr::new(req),
        req_cycle: req,
        resp_cycle: req + latency,
        kind: AccessKind::Gets,
        start,
        end,
    });
}

fn setup() -> (Arc<Mutex<EventRecorder>>, ContentionRecorder) {
    let recorder = Arc::new(Mutex::new(EventRecorder::new(8)));
    let contention = ContentionRecorder::new(Arc::clone(&recorder));
    (recorder, contention)
}

#[test]
fn no_record_is_noop() {
    let (_recorder, mut contention) = setup();
    contention.record(5);
    assert_eq!(contention.records(), 0);
    assert_eq!(contention.end_phase(100), 100);
}

/// Back-to-back accesses with no competing events replay exactly on time.
#[test]
fn uncontended_phase_has_no_slip() {
    let (recorder, mut contention) = setup();
    push_access(&recorder, 0, 100, 0);
    contention.record(0);
    push_access(&recorder, 150, 100, 0);
    contention.record(150);

    assert_eq!(contention.records(), 2);
    assert_eq!(contention.end_phase(250), 250);
    assert_eq!(contention.contention_cycles(), 0);
    assert_eq!(recorder.lock().unwrap().arena().live(), 0);
}

/// A speculative access holding the bank delays the demand chain.
#[test]
fn competing_bank_use_is_charged() {
    let (recorder, mut contention) = setup();
    {
        let mut guard = recorder.lock().unwrap();
        let _ = guard
            .arena_mut()
            .add(EventKind::Resource { bank: 0, occupancy: 500 }, 0);
    }
    push_access(&recorder, 0, 100, 0);
    contention.record(0);

    // The access waits for the bank until 500, then 4 + 96 cycles.
    assert_eq!(contention.end_phase(100), 600);
    assert_eq!(contention.contention_cycles(), 500);
}

/// A recorder that discards slip still replays and reclaims the chain.
#[test]
fn discarded_slip_leaves_clock_alone() {
    let recorder = Arc::new(Mutex::new(EventRecorder::new(8)));
    let mut contention = ContentionRecorder::new(Arc::clone(&recorder)).discard_slip();
    {
        let mut guard = recorder.lock().unwrap();
        let _ = guard
            .arena_mut()
            .add(EventKind::Resource { bank: 0, occupancy: 500 }, 0);
    }
    push_access(&recorder, 0, 100, 0);
    contention.record(0);

    assert_eq!(contention.end_phase(100), 100);
    assert_eq!(contention.contention_cycles(), 0);
    assert_eq!(recorder.lock().unwrap().arena().live(), 0);
}

/// Slip of an earlier access carries through the chain into the last one.
#[test]
fn slip_propagates_through_chain() {
    let (recorder, mut contention) = setup();
    {
        let mut guard = recorder.lock().unwrap();
        let _ = guard
            .arena_mut()
            .add(EventKind::Resource { bank: 3, occupancy: 50 }, 0);
    }
    push_access(&recorder, 0, 20, 3);
    contention.record(0);
    push_access(&recorder, 20, 20, 5);
    contention.record(20);

    assert_eq!(contention.end_phase(40), 90);
    assert_eq!(contention.contention_cycles(), 50);
}

#[test]
fn join_and_leave_track_halted_time() {
    let (_recorder, mut contention) = setup();
    assert_eq!(contention.notify_join(50, 1_000), 1_000);
    contention.notify_leave(1_200);
    assert_eq!(contention.notify_join(1_200, 5_000), 5_000);
    assert_eq!(contention.unhalted_cycles(6_000), 2_200);
}

/// A core already ahead of the global clock keeps its own cycle.
#[test]
fn join_never_moves_backwards() {
    let (_recorder, mut contention) = setup();
    assert_eq!(contention.notify_join(7_000, 5_000), 7_000);
}
