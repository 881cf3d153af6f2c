//! Global Simulator Constants.
//!
//! This module defines constants shared across components. It includes:
//! 1. **Graph Prefetcher Layout:** Number of fields in the reserved address window.
//! 2. **Readiness Bits:** Bit positions of the destination-slot readiness mask.
//! 3. **Stream Regions:** Geometry of the regions tracked by the Stream Prefetcher.

/// Number of element-sized fields in the Graph Prefetcher address window.
pub const GRAPH_FIELD_COUNT: u64 = 10;

/// Readiness bit for the destination edge (neighbor id) field.
pub const DEST_NODE_BIT: u8 = 1 << 0;

/// Readiness bit for the destination edge weight field.
pub const WEIGHT_VALUE_BIT: u8 = 1 << 1;

/// Readiness bit for the destination property field.
pub const DEST_PROPERTY_BIT: u8 = 1 << 2;

/// All destination readiness bits set (freshly launched slot).
pub const DEST_READY_MASK: u8 = DEST_NODE_BIT | WEIGHT_VALUE_BIT | DEST_PROPERTY_BIT;

/// Lines per Stream Prefetcher region (4 KiB with 64-byte lines).
pub const STREAM_REGION_LINES: u64 = 64;

/// Cycles after which a region's activity no longer protects it from replacement.
pub const STREAM_WARM_WINDOW: u64 = 500;
