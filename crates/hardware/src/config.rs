//! Configuration system for the timing core.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a simulation. It provides:
//! 1. **Defaults:** Baseline hardware constants (line size, phase length, cache and memory timing).
//! 2. **Structures:** Hierarchical config for general, Graph Prefetcher, Stream Prefetcher, cache, and memory.
//! 3. **Enums:** Memory controller and replacement policy types.
//! 4. **Validation:** `Config::validate` rejects values that cannot describe a buildable hierarchy.
//!
//! Configuration is supplied as JSON (`Config::from_json`/`Config::load`) or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::STREAM_WARM_WINDOW;
use crate::common::{ConfigError, SimError};

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in the JSON configuration.
mod defaults {
    /// Number of simulated cores.
    pub const NUM_CORES: usize = 1;

    /// Cycles per lock-step phase between barrier synchronizations.
    pub const PHASE_LENGTH: u64 = 10_000;

    /// Cache line size in bytes (64 bytes).
    pub const LINE_BYTES: u64 = 64;

    /// Recent-line window used by the locality sampler.
    pub const LOCALITY_WINDOW: usize = 64;

    /// Base of the reserved Graph Prefetcher address window.
    ///
    /// Sits in a canonical user-space hole that ordinary heap and stack
    /// addresses do not reach.
    pub const GRAPH_BASE_ADDR: u64 = 0x7ff0_0000_0000;

    /// Size in bytes of one field slot in the Graph Prefetcher window.
    pub const GRAPH_ELEMENT_SIZE: u64 = 8;

    /// Destination ring buffer capacity.
    pub const GRAPH_ENTRIES: usize = 16;

    /// Latency of a Graph Prefetcher load/store in cycles.
    pub const GRAPH_LATENCY: u64 = 1;

    /// Number of tracked Stream Prefetcher regions.
    pub const STREAM_ENTRIES: usize = 16;

    /// Confidence counter saturation value.
    pub const CONF_MAX: u32 = 3;

    /// Confidence needed before prefetches issue.
    pub const CONF_THRESHOLD: u32 = 2;

    /// Confidence of a freshly allocated region.
    pub const CONF_INITIAL: u32 = 1;

    /// Maximum run-ahead (in strides) before the deeper prefetch stops.
    pub const MAX_FETCH_DEPTH: u32 = 8;

    /// Default cache size in bytes (32 KiB).
    pub const CACHE_SIZE: usize = 32 * 1024;

    /// Default L2 size in bytes (256 KiB).
    pub const L2_SIZE: usize = 256 * 1024;

    /// Default cache associativity.
    pub const CACHE_WAYS: usize = 8;

    /// Default L1 access latency in cycles.
    pub const L1_LATENCY: u64 = 4;

    /// Default L2 access latency in cycles.
    pub const L2_LATENCY: u64 = 12;

    /// Fixed latency of the simple memory controller.
    pub const MEM_LATENCY: u64 = 100;

    /// CAS (Column Access Strobe) latency in cycles.
    pub const T_CAS: u64 = 14;

    /// RAS (Row Access Strobe) latency in cycles.
    pub const T_RAS: u64 = 14;

    /// Precharge latency in cycles.
    pub const T_PRE: u64 = 14;

    /// Independent memory banks used when replaying the event graph.
    pub const BANKS: usize = 8;

    /// Cycles a bank stays busy per access during replay.
    pub const BANK_OCCUPANCY: u64 = 4;
}

/// Memory controller implementation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryController {
    /// Fixed-latency controller: every access takes `latency` cycles.
    #[default]
    Simple,
    /// Row-buffer controller modeling CAS, RAS, and precharge.
    #[serde(alias = "DRAM")]
    Dram,
}

/// Core timing models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum CoreModel {
    /// IPC-1 core that adds contention cycles found by event replay.
    #[default]
    Timing,
    /// IPC-1 core that ignores contention; events are still replayed and reclaimed.
    Simple,
}

/// Cache replacement policy algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evicts the line accessed least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Evicts lines in fill order.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Evicts a pseudo-random way.
    #[serde(alias = "Random")]
    Random,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use graphsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.num_cores, 1);
/// assert_eq!(config.graph_prefetcher.element_size, 8);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use graphsim_core::config::{Config, MemoryController};
///
/// let json = r#"{
///     "general": { "num_cores": 2, "phase_length": 1000 },
///     "stream_prefetcher": { "enabled": true, "entries": 4 },
///     "memory": { "controller": "Dram" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.num_cores, 2);
/// assert!(config.stream_prefetcher.enabled);
/// assert_eq!(config.memory.controller, MemoryController::Dram);
/// assert_eq!(config.cache.l1_d.ways, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Graph Prefetcher window and ring buffer
    pub graph_prefetcher: GraphPrefetcherConfig,
    /// Stream Prefetcher between L1-D and L2
    pub stream_prefetcher: StreamPrefetcherConfig,
    /// Cache hierarchy configuration
    pub cache: CacheHierarchyConfig,
    /// Main memory configuration
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json).map_err(|source| SimError::Parse {
            what: "configuration".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| SimError::Parse {
            what: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a buildable system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.general;
        if g.line_bytes == 0 || !g.line_bytes.is_power_of_two() {
            return Err(ConfigError::LineSize(g.line_bytes));
        }
        if g.num_cores == 0 {
            return Err(ConfigError::NoCores);
        }
        if g.phase_length == 0 {
            return Err(ConfigError::PhaseLength);
        }

        if self.graph_prefetcher.entries == 0 {
            return Err(ConfigError::GraphEntries);
        }
        if self.graph_prefetcher.element_size == 0 {
            return Err(ConfigError::ElementSize);
        }

        let s = &self.stream_prefetcher;
        if s.entries == 0 {
            return Err(ConfigError::StreamEntries);
        }
        if s.conf_max == 0 || s.conf_threshold > s.conf_max || s.conf_initial > s.conf_max {
            return Err(ConfigError::Confidence {
                initial: s.conf_initial,
                threshold: s.conf_threshold,
                max: s.conf_max,
            });
        }

        for (name, cache) in [
            ("l1_i", &self.cache.l1_i),
            ("l1_d", &self.cache.l1_d),
            ("l2", &self.cache.l2),
        ] {
            cache.validate(name, g.line_bytes)?;
        }

        if self.memory.banks == 0 {
            return Err(ConfigError::Banks);
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Number of simulated cores (one trace each)
    #[serde(default = "GeneralConfig::default_num_cores")]
    pub num_cores: usize,

    /// Core timing model
    #[serde(default)]
    pub core_model: CoreModel,

    /// Cycles per lock-step phase
    #[serde(default = "GeneralConfig::default_phase_length")]
    pub phase_length: u64,

    /// Cache line size in bytes (power of two)
    #[serde(default = "GeneralConfig::default_line_bytes")]
    pub line_bytes: u64,

    /// Main memory leaves bank-bound timing records for contention attribution.
    ///
    /// Only memory-side records are affected: the Graph Prefetcher always
    /// records its own demand accesses, so with this off contention replay
    /// still runs but sees no bank conflicts.
    #[serde(default = "GeneralConfig::default_record_events")]
    pub record_events: bool,

    /// Recent-line window of the single-core locality sampler
    #[serde(default = "GeneralConfig::default_locality_window")]
    pub locality_window: usize,
}

impl GeneralConfig {
    fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }

    fn default_phase_length() -> u64 {
        defaults::PHASE_LENGTH
    }

    fn default_line_bytes() -> u64 {
        defaults::LINE_BYTES
    }

    fn default_record_events() -> bool {
        true
    }

    fn default_locality_window() -> usize {
        defaults::LOCALITY_WINDOW
    }

    /// Returns log2 of the line size.
    pub const fn line_bits(&self) -> u32 {
        self.line_bytes.trailing_zeros()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            num_cores: defaults::NUM_CORES,
            core_model: CoreModel::Timing,
            phase_length: defaults::PHASE_LENGTH,
            line_bytes: defaults::LINE_BYTES,
            record_events: true,
            locality_window: defaults::LOCALITY_WINDOW,
        }
    }
}

/// Graph Prefetcher configuration.
///
/// The reserved window spans `element_size * 10` bytes starting at `base_addr`;
/// each element-sized slot is one field (see `GraphField`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphPrefetcherConfig {
    /// Base of the reserved address window
    #[serde(default = "GraphPrefetcherConfig::default_base_addr")]
    pub base_addr: u64,

    /// Bytes per field slot
    #[serde(default = "GraphPrefetcherConfig::default_element_size")]
    pub element_size: u64,

    /// Destination ring buffer capacity
    #[serde(default = "GraphPrefetcherConfig::default_entries")]
    pub entries: usize,

    /// Load/store latency in cycles
    #[serde(default = "GraphPrefetcherConfig::default_latency")]
    pub latency: u64,
}

impl GraphPrefetcherConfig {
    fn default_base_addr() -> u64 {
        defaults::GRAPH_BASE_ADDR
    }

    fn default_element_size() -> u64 {
        defaults::GRAPH_ELEMENT_SIZE
    }

    fn default_entries() -> usize {
        defaults::GRAPH_ENTRIES
    }

    fn default_latency() -> u64 {
        defaults::GRAPH_LATENCY
    }
}

impl Default for GraphPrefetcherConfig {
    fn default() -> Self {
        Self {
            base_addr: defaults::GRAPH_BASE_ADDR,
            element_size: defaults::GRAPH_ELEMENT_SIZE,
            entries: defaults::GRAPH_ENTRIES,
            latency: defaults::GRAPH_LATENCY,
        }
    }
}

/// Stream Prefetcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamPrefetcherConfig {
    /// Interpose a Stream Prefetcher between each L1-D and the L2
    #[serde(default)]
    pub enabled: bool,

    /// Number of tracked regions
    #[serde(default = "StreamPrefetcherConfig::default_entries")]
    pub entries: usize,

    /// Confidence counter saturation value
    #[serde(default = "StreamPrefetcherConfig::default_conf_max")]
    pub conf_max: u32,

    /// Confidence needed to prefetch
    #[serde(default = "StreamPrefetcherConfig::default_conf_threshold")]
    pub conf_threshold: u32,

    /// Confidence of a fresh region
    #[serde(default = "StreamPrefetcherConfig::default_conf_initial")]
    pub conf_initial: u32,

    /// Cycles a region stays protected from replacement after activity
    #[serde(default = "StreamPrefetcherConfig::default_warm_window")]
    pub warm_window: u64,

    /// Maximum run-ahead (in strides) for the deeper prefetch
    #[serde(default = "StreamPrefetcherConfig::default_max_fetch_depth")]
    pub max_fetch_depth: u32,
}

impl StreamPrefetcherConfig {
    fn default_entries() -> usize {
        defaults::STREAM_ENTRIES
    }

    fn default_conf_max() -> u32 {
        defaults::CONF_MAX
    }

    fn default_conf_threshold() -> u32 {
        defaults::CONF_THRESHOLD
    }

    fn default_conf_initial() -> u32 {
        defaults::CONF_INITIAL
    }

    fn default_warm_window() -> u64 {
        STREAM_WARM_WINDOW
    }

    fn default_max_fetch_depth() -> u32 {
        defaults::MAX_FETCH_DEPTH
    }
}

impl Default for StreamPrefetcherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            entries: defaults::STREAM_ENTRIES,
            conf_max: defaults::CONF_MAX,
            conf_threshold: defaults::CONF_THRESHOLD,
            conf_initial: defaults::CONF_INITIAL,
            warm_window: STREAM_WARM_WINDOW,
            max_fetch_depth: defaults::MAX_FETCH_DEPTH,
        }
    }
}

/// Cache hierarchy configuration.
///
/// L1 caches are private per core; the L2 is shared by all cores.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheHierarchyConfig {
    /// L1 instruction cache
    pub l1_i: CacheConfig,
    /// L1 data cache
    pub l1_d: CacheConfig,
    /// Shared L2 cache
    pub l2: CacheConfig,
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            l1_i: CacheConfig::default(),
            l1_d: CacheConfig::default(),
            l2: CacheConfig {
                size_bytes: defaults::L2_SIZE,
                latency: defaults::L2_LATENCY,
                ..CacheConfig::default()
            },
        }
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Access latency in cycles
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_latency() -> u64 {
        defaults::L1_LATENCY
    }

    /// Number of sets for the given line size.
    pub const fn num_sets(&self, line_bytes: u64) -> usize {
        self.size_bytes / line_bytes as usize / self.ways
    }

    fn validate(&self, name: &str, line_bytes: u64) -> Result<(), ConfigError> {
        let line = line_bytes as usize;
        let fits = self.ways > 0
            && self.size_bytes >= line * self.ways
            && self.size_bytes % (line * self.ways) == 0;
        if fits {
            Ok(())
        } else {
            Err(ConfigError::CacheGeometry {
                name: name.to_string(),
                size_bytes: self.size_bytes,
                ways: self.ways,
                line_bytes,
            })
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            ways: defaults::CACHE_WAYS,
            latency: defaults::L1_LATENCY,
            policy: ReplacementPolicy::default(),
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Memory controller type
    #[serde(default)]
    pub controller: MemoryController,

    /// Fixed latency of the simple controller
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// CAS latency (column access strobe)
    #[serde(default = "MemoryConfig::default_t_cas")]
    pub t_cas: u64,

    /// RAS latency (row access strobe)
    #[serde(default = "MemoryConfig::default_t_ras")]
    pub t_ras: u64,

    /// Precharge latency
    #[serde(default = "MemoryConfig::default_t_pre")]
    pub t_pre: u64,

    /// Independent banks contended for during event replay
    #[serde(default = "MemoryConfig::default_banks")]
    pub banks: usize,

    /// Cycles a bank stays busy per access during event replay
    #[serde(default = "MemoryConfig::default_bank_occupancy")]
    pub bank_occupancy: u64,
}

impl MemoryConfig {
    fn default_latency() -> u64 {
        defaults::MEM_LATENCY
    }

    fn default_t_cas() -> u64 {
        defaults::T_CAS
    }

    fn default_t_ras() -> u64 {
        defaults::T_RAS
    }

    fn default_t_pre() -> u64 {
        defaults::T_PRE
    }

    fn default_banks() -> usize {
        defaults::BANKS
    }

    fn default_bank_occupancy() -> u64 {
        defaults::BANK_OCCUPANCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            controller: MemoryController::default(),
            latency: defaults::MEM_LATENCY,
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
            banks: defaults::BANKS,
            bank_occupancy: defaults::BANK_OCCUPANCY,
        }
    }
}
