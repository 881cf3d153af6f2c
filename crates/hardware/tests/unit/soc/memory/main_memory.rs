//! Main Memory Tests.
//!
//! Main memory grants permissions, counts reads and writebacks, and leaves a
//! timing record for each read whose subgraph occupies the line's bank.

use crate::common::harness::{context, test_config};
use crate::common::mocks::memory::MockMemoryController;
use graphsim_core::common::{AccessKind, CoherenceState, LineAddr};
use graphsim_core::sim::SimContext;
use graphsim_core::soc::memory::MainMemory;
use graphsim_core::soc::traits::{MemObject, MemReq};
use graphsim_core::stats::{ComponentStats, MemoryStats};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn memory(ctx: &Arc<SimContext>) -> MainMemory {
    MainMemory::with_controller("mem", Arc::clone(ctx), Box::new(MockMemoryController::new(100)))
}

fn access(mem: &mut MainMemory, line: u64, kind: AccessKind, cycle: u64) -> (u64, MemReq) {
    let mut req = MemReq::new(LineAddr::new(line), kind, cycle, 0);
    let resp = mem.access(&mut req);
    (resp, req)
}

/// Reads are granted with the permissions they ask for; writebacks are absorbed.
#[rstest]
#[case(AccessKind::Gets, CoherenceState::Exclusive)]
#[case(AccessKind::Getx, CoherenceState::Modified)]
#[case(AccessKind::Putx, CoherenceState::Invalid)]
fn grants_by_kind(#[case] kind: AccessKind, #[case] granted: CoherenceState) {
    let ctx = context(test_config());
    let mut mem = memory(&ctx);
    let (resp, req) = access(&mut mem, 3, kind, 20);
    assert_eq!(resp, 120);
    assert_eq!(req.state, granted);
}

/// Reads and writebacks are counted separately.
#[test]
fn counts_reads_and_writes() {
    let ctx = context(test_config());
    let mut mem = memory(&ctx);
    for kind in [AccessKind::Gets, AccessKind::Getx] {
        let _ = access(&mut mem, 0, kind, 0);
        let _ = ctx.lock_recorder(0).pop_record();
    }
    let _ = access(&mut mem, 0, AccessKind::Putx, 0);

    assert_eq!(
        mem.stats(),
        &MemoryStats {
            accesses: 3,
            reads: 2,
            writes: 1,
        }
    );
}

/// Only reads leave timing records, and only when recording is enabled.
#[test]
fn records_reads_only() {
    let ctx = context(test_config());
    let mut mem = memory(&ctx);

    let _ = access(&mut mem, 5, AccessKind::Putx, 0);
    assert!(!ctx.lock_recorder(0).has_record());

    let _ = access(&mut mem, 5, AccessKind::Gets, 40);
    let rec = ctx.lock_recorder(0).pop_record().unwrap();
    assert_eq!(rec.addr, LineAddr::new(5));
    assert_eq!((rec.req_cycle, rec.resp_cycle), (40, 140));
    assert_eq!(rec.kind, AccessKind::Gets);
}

#[test]
fn no_records_when_disabled() {
    let mut config = test_config();
    config.general.record_events = false;
    let ctx = context(config);
    let mut mem = memory(&ctx);

    let _ = access(&mut mem, 5, AccessKind::Gets, 40);
    assert!(!ctx.lock_recorder(0).has_record());
}

/// Replaying a lone read reproduces its response cycle.
#[test]
fn record_replays_to_response() {
    let ctx = context(test_config());
    let mut mem = memory(&ctx);
    let _ = access(&mut mem, 0, AccessKind::Gets, 10);

    let mut recorder = ctx.lock_recorder(0);
    let rec = recorder.pop_record().unwrap();
    let arena = recorder.arena_mut();
    let _ = arena.replay();
    assert_eq!(arena.done_cycle(rec.end), Some(110));
}

/// Simultaneous reads to one bank serialize on replay; other banks do not.
#[rstest]
#[case(1, 104)]
#[case(32, 100)]
fn bank_conflicts_serialize(#[case] second_line: u64, #[case] second_done: u64) {
    let ctx = context(test_config());
    let mut mem = memory(&ctx);

    let _ = access(&mut mem, 0, AccessKind::Gets, 0);
    let first = ctx.lock_recorder(0).pop_record().unwrap();
    let _ = access(&mut mem, second_line, AccessKind::Gets, 0);
    let second = ctx.lock_recorder(0).pop_record().unwrap();

    let mut recorder = ctx.lock_recorder(0);
    let arena = recorder.arena_mut();
    let _ = arena.replay();
    assert_eq!(arena.done_cycle(first.end), Some(100));
    assert_eq!(arena.done_cycle(second.end), Some(second_done));
}

/// Statistics are reported under the memory's name.
#[test]
fn collect_stats_reports_memory() {
    let ctx = context(test_config());
    let mem = memory(&ctx);
    let mut out = Vec::new();
    mem.collect_stats(&mut out);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "mem");
    assert!(matches!(out[0].stats, ComponentStats::Memory(_)));
}
