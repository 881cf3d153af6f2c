//! Access descriptors pushed by the front end ahead of the demand stream.

use serde::{Deserialize, Serialize};

/// Addresses a source node's processing will touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    /// Byte address of the node's property.
    pub property: u64,
    /// Byte address of the first neighbor offset.
    pub offset_start: u64,
    /// Byte address of the last neighbor offset.
    pub offset_end: u64,
    /// Number of neighbors.
    #[serde(default)]
    pub neighbors: u32,
}

/// Addresses one neighbor's processing will touch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DestinationDescriptor {
    /// Byte address of the edge (neighbor id).
    pub edge: u64,
    /// Byte address of the edge weight.
    pub weight: u64,
    /// Byte address of the neighbor's property.
    pub property: u64,
}
