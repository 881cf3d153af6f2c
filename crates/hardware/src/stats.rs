//! Simulation statistics collection and reporting.
//!
//! This module tracks the observable counters of a timing run. It provides:
//! 1. **Core counters:** Cycles, contention cycles, instructions, and locality per core.
//! 2. **Graph Prefetcher counters:** Demand loads/stores and launched access phases.
//! 3. **Memory hierarchy counters:** Named cache, Stream Prefetcher, and main memory counters.
//! 4. **Reporting:** Sectioned text output (`print_sections`) and JSON via `serde`.
//!
//! Counters are observability only; nothing in the timing model reads them back.

use std::time::Instant;

use serde::Serialize;

/// Per-core timing counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoreStats {
    /// Core index.
    pub core: u32,
    /// Final cycle of the core (including contention).
    pub cycles: u64,
    /// Cycles attributed to contention during event replay.
    pub contention_cycles: u64,
    /// Cycles spent outside the barrier (not halted).
    pub unhalted_cycles: u64,
    /// Instructions executed.
    pub instrs: u64,
    /// Instructions executed inside offload regions.
    pub offload_instrs: u64,
    /// Data loads dispatched.
    pub loads: u64,
    /// Data stores dispatched.
    pub stores: u64,
    /// Spatial locality ×10000 (single-core runs only).
    pub spatial_locality: u64,
    /// Temporal locality ×10000 (single-core runs only).
    pub temporal_locality: u64,
    /// Graph Prefetcher attached to this core.
    pub graph_prefetcher: GraphPrefetcherStats,
}

/// Graph Prefetcher counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphPrefetcherStats {
    /// Demand loads served from the reserved window.
    pub loads: u64,
    /// Stores to the reserved window.
    pub stores: u64,
    /// Source-access phases launched (`SrcNode` stores).
    pub source_phases: u64,
    /// Destination-access phases launched (ring slots filled).
    pub destination_phases: u64,
    /// Ring slots fully drained by demand reads.
    pub slots_drained: u64,
    /// Speculative requests sent to the parent memory object.
    pub speculative_accesses: u64,
}

/// Cache hit/miss counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests that found the line with sufficient permissions.
    pub hits: u64,
    /// Requests forwarded to the parent.
    pub misses: u64,
    /// Dirty victims written back to the parent.
    pub writebacks: u64,
    /// Lines dropped by invalidations or context switches.
    pub invalidations: u64,
}

impl CacheStats {
    /// Total lookups.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Miss ratio in percent, or 0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            (self.misses as f64 / total as f64) * 100.0
        }
    }
}

/// Stream Prefetcher counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamPrefetcherStats {
    /// Read requests observed.
    pub accesses: u64,
    /// Prefetches issued to the parent.
    pub prefetches: u64,
    /// Prefetch targets that were already valid.
    pub double_prefetches: u64,
    /// Accesses whose region was tracked.
    pub page_hits: u64,
    /// Accesses to a line delivered by prefetch.
    pub hits: u64,
    /// Prefetch hits whose data was still in flight.
    pub short_hits: u64,
    /// Tracked stride changes.
    pub stride_switches: u64,
    /// Matching-stride accesses below the confidence threshold.
    pub low_conf_accs: u64,
}

/// Main memory counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    /// All requests.
    pub accesses: u64,
    /// GETS/GETX requests.
    pub reads: u64,
    /// PUTX writebacks.
    pub writes: u64,
}

/// Counters of one memory-hierarchy component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentStats {
    /// A cache level.
    Cache(CacheStats),
    /// A Stream Prefetcher.
    StreamPrefetcher(StreamPrefetcherStats),
    /// Main memory.
    Memory(MemoryStats),
}

/// Counters tagged with the component name they came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedStats {
    /// Component name (for example `l1d-0`).
    pub name: String,
    /// The counters.
    #[serde(flatten)]
    pub stats: ComponentStats,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"core"`, `"graph"`, `"stream"`, `"memory"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "core", "graph", "stream", "memory"];

/// Statistics of a whole run.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// One entry per core, in core order.
    pub cores: Vec<CoreStats>,
    /// Memory hierarchy components, private levels first.
    pub components: Vec<NamedStats>,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cores: Vec::new(),
            components: Vec::new(),
        }
    }
}

impl SimStats {
    /// Measures host time from `start` instead of from construction.
    pub(crate) fn since(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Simulated cycles: the slowest core's final cycle.
    pub fn cycles(&self) -> u64 {
        self.cores.iter().map(|c| c.cycles).max().unwrap_or(0)
    }

    /// Instructions executed by all cores.
    pub fn instrs(&self) -> u64 {
        self.cores.iter().map(|c| c.instrs).sum()
    }

    /// Looks up a component's counters by name.
    pub fn component(&self, name: &str) -> Option<&ComponentStats> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.stats)
    }

    /// Serializes the statistics as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `STATS_SECTIONS`. Pass an
    /// empty slice to print all sections (same as `print()`).
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cycles = self.cycles();
        let instrs = self.instrs();

        if want("summary") {
            let cyc = cycles.max(1);
            let ipc = instrs as f64 / cyc as f64;
            let khz = if seconds > 0.0 {
                (cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("GRAPH TIMING SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cores                {}", self.cores.len());
            println!("sim_cycles               {cycles}");
            println!("sim_freq                 {khz:.2} kHz");
            println!("sim_instrs               {instrs}");
            println!("sim_ipc                  {ipc:.4}");
            println!("----------------------------------------------------------");
        }
        if want("core") {
            println!("CORE BREAKDOWN");
            for c in &self.cores {
                let cyc = c.cycles.max(1);
                println!(
                    "  core{:<3} cycles {:<12} contention {:<10} ({:.2}%) instrs {:<12} offload {}",
                    c.core,
                    c.cycles,
                    c.contention_cycles,
                    (c.contention_cycles as f64 / cyc as f64) * 100.0,
                    c.instrs,
                    c.offload_instrs
                );
                println!(
                    "          loads {:<13} stores {:<14} locality spatial {} temporal {}",
                    c.loads, c.stores, c.spatial_locality, c.temporal_locality
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("graph") {
            println!("GRAPH PREFETCHER");
            for c in &self.cores {
                let g = &c.graph_prefetcher;
                println!(
                    "  core{:<3} loads {:<10} stores {:<10} src_phases {:<8} dst_phases {:<8} drained {:<8} spec {}",
                    c.core,
                    g.loads,
                    g.stores,
                    g.source_phases,
                    g.destination_phases,
                    g.slots_drained,
                    g.speculative_accesses
                );
            }
            println!("----------------------------------------------------------");
        }
        if want("stream") {
            println!("STREAM PREFETCHER");
            for named in &self.components {
                if let ComponentStats::StreamPrefetcher(s) = &named.stats {
                    println!(
                        "  {:<8} acc {:<9} pf {:<8} dbl {:<6} page_hits {:<8} hits {:<8} short {:<6} switch {:<6} low_conf {}",
                        named.name,
                        s.accesses,
                        s.prefetches,
                        s.double_prefetches,
                        s.page_hits,
                        s.hits,
                        s.short_hits,
                        s.stride_switches,
                        s.low_conf_accs
                    );
                }
            }
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            println!("MEMORY HIERARCHY");
            for named in &self.components {
                match &named.stats {
                    ComponentStats::Cache(c) => println!(
                        "  {:<8} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}% | writebacks: {}",
                        named.name,
                        c.accesses(),
                        c.hits,
                        c.miss_rate(),
                        c.writebacks
                    ),
                    ComponentStats::Memory(m) => println!(
                        "  {:<8} accesses: {:<10} | reads: {:<10} | writes: {}",
                        named.name, m.accesses, m.reads, m.writes
                    ),
                    ComponentStats::StreamPrefetcher(_) => {}
                }
            }
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
