//! Simulator End-to-End Tests.
//!
//! Runs small synthetic traces through the complete hierarchy with the real
//! phase barrier, one thread per core.

use crate::common::harness::{init_tracing, test_config};
use graphsim_core::Simulator;
use graphsim_core::common::SimError;
use graphsim_core::config::{Config, CoreModel};
use graphsim_core::core::cpu::BasicBlock;
use graphsim_core::core::units::prefetch::graph::{
    DestinationDescriptor, GraphWindow, SourceDescriptor,
};
use graphsim_core::sim::{DataAccess, TraceEvent};
use graphsim_core::stats::ComponentStats;
use pretty_assertions::assert_eq;

fn bbl(addr: u64, instrs: u64) -> TraceEvent {
    TraceEvent::Bbl(BasicBlock {
        addr,
        bytes: instrs * 4,
        instrs,
    })
}

fn load(addr: u64) -> TraceEvent {
    TraceEvent::Load(DataAccess { addr, size: 8 })
}

/// A loop body that sweeps `lines` consecutive data lines from `base`.
fn sweep(base: u64, lines: u64) -> Vec<TraceEvent> {
    (0..lines)
        .flat_map(|i| [bbl(0x1000, 4), load(base + i * 64)])
        .collect()
}

/// One vertex with `neighbors` edges, processed through the Graph Prefetcher.
fn vertex(window: &GraphWindow, neighbors: u64) -> Vec<TraceEvent> {
    let field = |idx: u64| window.base() + idx * window.element_size();
    let mut trace = vec![TraceEvent::PushSource(SourceDescriptor {
        property: 0x40_0000,
        offset_start: 0x50_0000,
        offset_end: 0x50_0000 + neighbors * 8,
        neighbors: neighbors as u32,
    })];
    for i in 0..neighbors {
        trace.push(TraceEvent::PushDestination(DestinationDescriptor {
            edge: 0x60_0000 + i * 8,
            weight: 0x70_0000 + i * 8,
            property: 0x80_0000 + i * 4096,
        }));
    }
    trace.push(TraceEvent::Store(DataAccess {
        addr: field(4),
        size: 8,
    }));
    trace.push(load(field(6)));
    for _ in 0..neighbors {
        trace.push(bbl(0x2000, 6));
        for idx in [7, 8, 9] {
            trace.push(load(field(idx)));
        }
    }
    trace
}

fn run(config: Config, traces: &[Vec<TraceEvent>]) -> graphsim_core::stats::SimStats {
    init_tracing();
    Simulator::new(config).unwrap().run(traces).unwrap()
}

/// There must be exactly one trace per core.
#[test]
fn rejects_trace_count_mismatch() {
    init_tracing();
    let mut sim = Simulator::new(test_config()).unwrap();
    let err = sim.run(&[Vec::new(), Vec::new()]).unwrap_err();
    assert!(matches!(
        err,
        SimError::TraceCount {
            expected: 1,
            got: 2
        }
    ));
}

/// A single-core run reports core and component counters.
#[test]
fn single_core_run() {
    let stats = run(test_config(), &[sweep(0x10_0000, 32)]);

    assert_eq!(stats.cores.len(), 1);
    assert_eq!(stats.instrs(), 32 * 4);
    assert_eq!(stats.cores[0].loads, 32);
    assert!(stats.cycles() > 32 * 100);
    match stats.component("l1d-0") {
        Some(ComponentStats::Cache(c)) => assert_eq!(c.misses, 32),
        other => panic!("unexpected l1d stats {other:?}"),
    }
    assert!(matches!(stats.component("mem"), Some(ComponentStats::Memory(_))));
}

/// The simulator owns one core per configured core, all starting at cycle 0.
#[test]
fn builds_one_core_per_config_core() {
    init_tracing();
    let mut config = test_config();
    config.general.num_cores = 3;
    let sim = Simulator::new(config).unwrap();

    assert_eq!(sim.context().num_cores(), 3);
    let ids: Vec<_> = sim.cores().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(sim.cores().iter().all(|c| c.cycle() == 0));
}

/// Identical inputs give identical statistics.
#[test]
fn runs_are_deterministic() {
    let mut config = test_config();
    config.general.num_cores = 2;
    config.general.phase_length = 200;
    let traces = [sweep(0x10_0000, 64), sweep(0x20_0000, 16)];

    let a = run(config.clone(), &traces);
    let b = run(config, &traces);
    assert_eq!(a.to_json(), b.to_json());
}

/// Cores with traces of different lengths all finish; the short one leaves early.
#[test]
fn uneven_traces_complete() {
    let mut config = test_config();
    config.general.num_cores = 3;
    config.general.phase_length = 100;
    let traces = [
        sweep(0x10_0000, 128),
        sweep(0x20_0000, 4),
        Vec::new(),
    ];
    let stats = run(config, &traces);

    assert_eq!(stats.cores[0].loads, 128);
    assert_eq!(stats.cores[1].loads, 4);
    assert_eq!(stats.cores[2].instrs, 0);
    assert!(stats.cores[0].cycles > stats.cores[1].cycles);
    assert!(stats.cores.iter().all(|c| c.unhalted_cycles <= c.cycles));
}

/// Graph Prefetcher traffic flows end to end.
#[test]
fn graph_prefetcher_run() {
    let config = test_config();
    let window = GraphWindow::new(
        config.graph_prefetcher.base_addr,
        config.graph_prefetcher.element_size,
    );
    let stats = run(config, &[vertex(&window, 6)]);

    let graph = &stats.cores[0].graph_prefetcher;
    assert_eq!(graph.source_phases, 1);
    assert_eq!(graph.destination_phases, 6);
    assert_eq!(graph.slots_drained, 6);
    assert_eq!(graph.loads, 1 + 6 * 3);
    match stats.component("l1d-0") {
        Some(ComponentStats::Cache(c)) => assert_eq!(c.accesses(), 0),
        other => panic!("unexpected l1d stats {other:?}"),
    }
}

/// The simple core model runs the same accesses but never charges contention.
#[test]
fn simple_core_ignores_contention() {
    let timing_config = test_config();
    let window = GraphWindow::new(
        timing_config.graph_prefetcher.base_addr,
        timing_config.graph_prefetcher.element_size,
    );
    let trace = [vertex(&window, 6)];
    let mut simple_config = timing_config.clone();
    simple_config.general.core_model = CoreModel::Simple;

    let timing = run(timing_config, &trace);
    let simple = run(simple_config, &trace);

    assert_eq!(simple.cores[0].contention_cycles, 0);
    assert_eq!(simple.cores[0].graph_prefetcher, timing.cores[0].graph_prefetcher);
    // One phase only: the sole replay happens when the core leaves.
    assert_eq!(
        timing.cores[0].cycles,
        simple.cores[0].cycles + timing.cores[0].contention_cycles
    );
}

/// A sequential sweep runs faster with the Stream Prefetcher.
#[test]
fn stream_prefetcher_speeds_up_sweep() {
    let trace = [sweep(0x10_0000, 256)];
    let without = run(test_config(), &trace);

    let mut config = test_config();
    config.stream_prefetcher.enabled = true;
    let with = run(config, &trace);

    assert!(with.cycles() < without.cycles());
    match with.component("stream-0") {
        Some(ComponentStats::StreamPrefetcher(s)) => assert!(s.prefetches > 0),
        other => panic!("unexpected stream stats {other:?}"),
    }
}
