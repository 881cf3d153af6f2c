//! Timing event infrastructure.
//!
//! This module contains the pieces that mirror scalar cycle arithmetic as an
//! event dependency graph:
//! 1. **Events:** Index-addressed arena of timing nodes with explicit attach/detach.
//! 2. **Recorder:** Per-requester slot for the timing record of the last access.
//! 3. **Contention:** Per-core chaining and end-of-phase replay of those records.

/// Per-core contention recorder.
pub mod contention;

/// Timing event arena.
pub mod event;

/// Per-requester event recorder.
pub mod recorder;

pub use self::contention::ContentionRecorder;
pub use self::event::{EventArena, EventId, EventKind};
pub use self::recorder::{EventRecorder, TimingRecord};
