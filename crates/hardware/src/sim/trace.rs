//! Trace format.
//!
//! One JSON object per line, each naming one event of a core's instruction
//! stream:
//!
//! ```text
//! {"bbl": {"addr": 4096, "bytes": 32, "instrs": 8}}
//! {"load": {"addr": 8192, "size": 8}}
//! {"store": {"addr": 8192, "size": 8}}
//! {"push_source": {"property": 4096, "offset_start": 8192, "offset_end": 8192, "neighbors": 4}}
//! {"push_destination": {"edge": 12288, "weight": 16384, "property": 20480}}
//! {"offload_begin": null}
//! {"offload_end": null}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::SimError;
use crate::core::cpu::{BasicBlock, BblOutcome, TimingCore};
use crate::core::units::prefetch::graph::{DestinationDescriptor, SourceDescriptor};

/// A data access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DataAccess {
    /// Byte address.
    pub addr: u64,
    /// Access size in bytes.
    #[serde(default)]
    pub size: u32,
}

/// One event of a core's trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    /// Basic block executed.
    Bbl(BasicBlock),
    /// Data load.
    Load(DataAccess),
    /// Data store.
    Store(DataAccess),
    /// Source descriptor for the Graph Prefetcher.
    PushSource(SourceDescriptor),
    /// Destination descriptor for the Graph Prefetcher.
    PushDestination(DestinationDescriptor),
    /// Offload region begins.
    OffloadBegin,
    /// Offload region ends.
    OffloadEnd,
}

impl TraceEvent {
    /// Feeds the event to `core`.
    pub fn apply(&self, core: &mut TimingCore) -> BblOutcome {
        match *self {
            Self::Bbl(bbl) => return core.bbl(&bbl),
            Self::Load(acc) => {
                let _ = core.load(acc.addr, acc.size);
            }
            Self::Store(acc) => {
                let _ = core.store(acc.addr, acc.size);
            }
            Self::PushSource(desc) => core.push_source(desc),
            Self::PushDestination(desc) => core.push_destination(desc),
            Self::OffloadBegin => core.offload_begin(),
            Self::OffloadEnd => core.offload_end(),
        }
        BblOutcome::Continue
    }

    /// Serializes the event as one trace line.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Parses a JSON-lines trace; `what` names the source in errors.
///
/// # Errors
///
/// `SimError::Parse` naming the first line that is not a valid event.
pub fn parse_trace(text: &str, what: &str) -> Result<Vec<TraceEvent>, SimError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| SimError::Parse {
                what: format!("{what}:{}", idx + 1),
                source,
            })
        })
        .collect()
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// `SimError::Io` if the file cannot be read, `SimError::Parse` on a bad line.
pub fn load_trace(path: &Path) -> Result<Vec<TraceEvent>, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text, &path.display().to_string())
}
