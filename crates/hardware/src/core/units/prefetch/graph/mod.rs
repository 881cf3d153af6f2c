//! Graph Prefetcher.
//!
//! A prefetcher specialized for vertex-centric graph processing. The front end
//! pushes descriptors of the addresses a source node and each of its neighbors
//! will touch; the prefetcher fetches them speculatively and serves the
//! program's later demand reads from a reserved address window:
//! 1. **Window:** `base + field * element_size` addresses one `GraphField`.
//! 2. **Descriptors:** Unbounded FIFO queues of source and destination descriptors.
//! 3. **Ring:** Fixed-capacity buffer of in-flight destination fetches.
//! 4. **Prefetcher:** The load/store protocol and its event subgraph.

/// Source and destination access descriptors.
pub mod descriptor;

/// The prefetcher proper.
pub mod prefetcher;

/// Destination slot ring buffer.
pub mod ring;

pub use self::descriptor::{DestinationDescriptor, SourceDescriptor};
pub use self::prefetcher::GraphPrefetcher;
pub use self::ring::{DestField, DestSlot, DestinationRing};

use crate::common::constants::GRAPH_FIELD_COUNT;

/// Field of the reserved window, by element index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GraphField {
    /// Neighbor offset array (store: latency only).
    Offset = 0,
    /// Edge array (store: latency only).
    Edge = 1,
    /// Weight array (store: latency only).
    Weight = 2,
    /// Property array (store: latency only).
    Property = 3,
    /// Source node (store: starts a source-access phase).
    SrcNode = 4,
    /// Update count (load: latency only).
    UpdatesSize = 5,
    /// Source property (load).
    SrcProperty = 6,
    /// Destination node (load).
    DestNode = 7,
    /// Destination edge weight (load).
    WeightValue = 8,
    /// Destination property (load).
    DestProperty = 9,
}

impl GraphField {
    /// All fields in index order.
    pub const ALL: [Self; GRAPH_FIELD_COUNT as usize] = [
        Self::Offset,
        Self::Edge,
        Self::Weight,
        Self::Property,
        Self::SrcNode,
        Self::UpdatesSize,
        Self::SrcProperty,
        Self::DestNode,
        Self::WeightValue,
        Self::DestProperty,
    ];

    /// Field with element index `index`, if any.
    pub const fn from_index(index: u64) -> Option<Self> {
        if index < GRAPH_FIELD_COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Element index of the field.
    pub const fn index(self) -> u64 {
        self as u64
    }

    /// The destination field this index reads, if it is one.
    pub const fn dest_field(self) -> Option<DestField> {
        match self {
            Self::DestNode => Some(DestField::Node),
            Self::WeightValue => Some(DestField::Weight),
            Self::DestProperty => Some(DestField::Property),
            _ => None,
        }
    }
}

/// The reserved Graph Prefetcher address window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphWindow {
    base: u64,
    element_size: u64,
}

impl GraphWindow {
    /// Creates a window of `GRAPH_FIELD_COUNT` elements starting at `base`.
    pub const fn new(base: u64, element_size: u64) -> Self {
        Self { base, element_size }
    }

    /// First byte of the window.
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Bytes per field.
    pub const fn element_size(&self) -> u64 {
        self.element_size
    }

    /// One past the last byte of the window.
    pub const fn limit(&self) -> u64 {
        self.base
            .saturating_add(self.element_size.saturating_mul(GRAPH_FIELD_COUNT))
    }

    /// Returns `true` if `addr` lies inside the window.
    #[inline]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.limit()
    }

    /// Field addressed by `addr`, or `None` outside the window.
    #[inline]
    pub const fn field(&self, addr: u64) -> Option<GraphField> {
        if self.contains(addr) {
            GraphField::from_index((addr - self.base) / self.element_size)
        } else {
            None
        }
    }

    /// Byte address of `field`.
    pub const fn addr_of(&self, field: GraphField) -> u64 {
        self.base + field.index() * self.element_size
    }
}
