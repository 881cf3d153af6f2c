//! Memory Access Types.
//!
//! This module defines the classification of requests travelling through the
//! memory hierarchy:
//! 1. **Request kinds:** Shared read, exclusive read, and writeback.
//! 2. **Coherence states:** MESI state carried in and out of each request.
//! 3. **Flags:** Per-request modifiers such as speculative prefetch.

use serde::Serialize;

/// Kind of memory request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AccessKind {
    /// Read for shared access (loads, instruction fetch, prefetches).
    Gets,
    /// Read for exclusive access (stores).
    Getx,
    /// Writeback of a dirty line to the next level.
    Putx,
}

impl AccessKind {
    /// Returns `true` for requests that read data from the next level.
    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Gets | Self::Getx)
    }
}

/// MESI coherence state of a line as seen by the requester.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CoherenceState {
    /// Not present / no permissions.
    #[default]
    Invalid,
    /// Read-only, possibly shared with other caches.
    Shared,
    /// Read-only, held by this cache only.
    Exclusive,
    /// Dirty, held by this cache only.
    Modified,
}

impl CoherenceState {
    /// Returns `true` if the line carries any permission.
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// Request modifier flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReqFlags(pub u32);

impl ReqFlags {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Speculative request; must not grant permissions to the requester.
    pub const PREFETCH: Self = Self(1 << 0);
    /// Instruction fetch.
    pub const IFETCH: Self = Self(1 << 1);

    /// Returns `true` if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both flag sets.
    #[inline]
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the flag set with every bit of `other` cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}
