//! SimStats unit tests.
//!
//! Verifies aggregation across cores, component lookup, derived cache
//! metrics, and JSON serialization.

use graphsim_core::stats::{
    CacheStats, ComponentStats, CoreStats, MemoryStats, NamedStats, STATS_SECTIONS, SimStats,
};
use pretty_assertions::assert_eq;

fn core(id: u32, cycles: u64, instrs: u64) -> CoreStats {
    CoreStats {
        core: id,
        cycles,
        instrs,
        ..CoreStats::default()
    }
}

fn populated() -> SimStats {
    let mut stats = SimStats::default();
    stats.cores.push(core(0, 900, 400));
    stats.cores.push(core(1, 1200, 300));
    stats.components.push(NamedStats {
        name: "l1d-0".to_string(),
        stats: ComponentStats::Cache(CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        }),
    });
    stats.components.push(NamedStats {
        name: "mem".to_string(),
        stats: ComponentStats::Memory(MemoryStats {
            accesses: 1,
            reads: 1,
            writes: 0,
        }),
    });
    stats
}

#[test]
fn default_stats_are_empty() {
    let stats = SimStats::default();
    assert_eq!(stats.cycles(), 0);
    assert_eq!(stats.instrs(), 0);
    assert!(stats.component("l2").is_none());
}

/// Run length is the slowest core; instructions add up.
#[test]
fn aggregates_cores() {
    let stats = populated();
    assert_eq!(stats.cycles(), 1200);
    assert_eq!(stats.instrs(), 700);
}

#[test]
fn looks_up_components_by_name() {
    let stats = populated();
    match stats.component("l1d-0") {
        Some(ComponentStats::Cache(c)) => {
            assert_eq!(c.accesses(), 4);
            assert!((c.miss_rate() - 25.0).abs() < f64::EPSILON);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(stats.component("l1d-1").is_none());
}

#[test]
fn miss_rate_without_accesses_is_zero() {
    assert!(CacheStats::default().miss_rate().abs() < f64::EPSILON);
}

/// Components serialize flat: name, kind tag, then counters; host time is not serialized.
#[test]
fn json_is_tagged() {
    let json: serde_json::Value = serde_json::from_str(&populated().to_json()).unwrap();
    assert_eq!(json["cores"][1]["cycles"], 1200);
    assert_eq!(json["components"][0]["name"], "l1d-0");
    assert_eq!(json["components"][0]["kind"], "cache");
    assert_eq!(json["components"][1]["kind"], "memory");
    assert_eq!(json["components"][0]["hits"], 3);
    assert!(json["components"][0].get("stats").is_none());
    assert!(json.get("start_time").is_none());
}

#[test]
fn sections_are_known() {
    assert_eq!(
        STATS_SECTIONS,
        &["summary", "core", "graph", "stream", "memory"]
    );
}

/// Printing every section must not panic on an empty run.
#[test]
fn prints_empty_run() {
    SimStats::default().print();
    populated().print_sections(&["memory".to_string()]);
}
