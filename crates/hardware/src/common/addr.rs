//! Cache-line address type.
//!
//! Every memory object in the hierarchy speaks in line addresses (byte address
//! shifted right by the line bits). Keeping them in a newtype stops byte
//! addresses from leaking into the access contract. It provides:
//! 1. **Conversion:** From byte addresses given the configured line size.
//! 2. **Region decomposition:** Tag/position split used by the Stream Prefetcher.

use super::constants::STREAM_REGION_LINES;

/// A cache-line address (byte address >> line bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineAddr(pub u64);

impl LineAddr {
    /// Creates a line address from a raw line number.
    #[inline(always)]
    pub const fn new(line: u64) -> Self {
        Self(line)
    }

    /// Converts a byte address to the line containing it.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address.
    /// * `line_bits` - log2 of the line size in bytes.
    #[inline(always)]
    pub const fn from_byte(addr: u64, line_bits: u32) -> Self {
        Self(addr >> line_bits)
    }

    /// Returns the raw line number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns the tag of the 64-line region this line belongs to.
    #[inline(always)]
    pub const fn region(self) -> u64 {
        self.0 / STREAM_REGION_LINES
    }

    /// Returns the line's position (0..64) inside its region.
    #[inline(always)]
    pub const fn position(self) -> u32 {
        (self.0 % STREAM_REGION_LINES) as u32
    }

    /// Returns the line `delta` lines away, wrapping on overflow.
    #[inline(always)]
    pub const fn offset(self, delta: i64) -> Self {
        Self(self.0.wrapping_add(delta as u64))
    }
}

impl std::fmt::Display for LineAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
