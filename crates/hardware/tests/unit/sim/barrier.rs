//! Phase Barrier Tests.

use crate::common::harness::{context_with, test_config};
use crate::common::mocks::barrier::MockBarrier;
use graphsim_core::sim::{PhaseBarrier, PhaseSync};
use std::sync::Arc;
use std::thread;

/// Joining reports the global phase cycle.
#[test]
fn join_reports_global_cycle() {
    let barrier = PhaseBarrier::new(1000);
    assert_eq!(barrier.join(0), 0);
    assert_eq!(barrier.take_barrier(0, 0), 0);
    assert_eq!(barrier.join(1), 1000);
    assert_eq!(barrier.global_cycle(), 1000);
}

/// A lone participant never waits.
#[test]
fn single_member_advances_immediately() {
    let barrier = PhaseBarrier::new(100);
    let _ = barrier.join(0);
    for phase in 1..=3 {
        assert_eq!(barrier.take_barrier(0, 5), 5);
        assert_eq!(barrier.phase(), phase);
    }
}

/// The phase ends only once every member has arrived.
#[test]
fn all_members_must_arrive() {
    let barrier = PhaseBarrier::new(100);
    for core in 0..4 {
        let _ = barrier.join(core);
    }
    thread::scope(|s| {
        for core in 0..4 {
            let barrier = &barrier;
            let _ = s.spawn(move || {
                for _ in 0..10 {
                    let _ = barrier.take_barrier(core, core);
                }
            });
        }
    });
    assert_eq!(barrier.phase(), 10);
    assert_eq!(barrier.global_cycle(), 1000);
}

/// A member leaving releases the others waiting on it.
#[test]
fn leave_releases_waiters() {
    let barrier = PhaseBarrier::new(100);
    let _ = barrier.join(0);
    let _ = barrier.join(1);
    thread::scope(|s| {
        let waiter = s.spawn(|| barrier.take_barrier(0, 0));
        barrier.leave(1);
        assert_eq!(waiter.join().unwrap(), 0);
    });
    assert_eq!(barrier.phase(), 1);
}

/// Leaving twice, or without joining, changes nothing.
#[test]
fn leave_of_non_member_is_ignored() {
    let barrier = PhaseBarrier::new(100);
    barrier.leave(3);
    let _ = barrier.join(0);
    barrier.leave(0);
    barrier.leave(0);
    assert_eq!(barrier.phase(), 0);
}

#[test]
#[should_panic(expected = "without joining")]
fn take_without_join_panics() {
    let barrier = PhaseBarrier::new(100);
    let _ = barrier.take_barrier(2, 2);
}

/// Any barrier can sit behind a context, which formats for logging.
#[test]
fn context_over_scripted_barrier_formats() {
    let ctx = context_with(test_config(), Arc::new(MockBarrier::passive(0)));
    assert!(format!("{ctx:?}").contains("MockBarrier"));
}
