//! Levels shared between cores.
//!
//! The shared level (L2 and main memory behind it) is the only cross-core
//! mutable state. It sits behind one coarse mutex; a `SharedPort` is a
//! per-client handle that takes the lock for the duration of each access, so
//! the guard is the lock token the request carries through the shared level.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::soc::traits::{InvReq, MemObject, MemReq};
use crate::stats::NamedStats;

/// A memory object shared between cores.
pub type SharedLevel = Arc<Mutex<Box<dyn MemObject>>>;

/// Wraps `obj` for sharing between cores.
pub fn share(obj: Box<dyn MemObject>) -> SharedLevel {
    Arc::new(Mutex::new(obj))
}

/// Locks a shared level, recovering from poisoning.
pub fn lock(level: &SharedLevel) -> MutexGuard<'_, Box<dyn MemObject>> {
    level.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Appends the counters of a shared level (and everything above it).
pub fn collect_shared(level: &SharedLevel, out: &mut Vec<NamedStats>) {
    lock(level).collect_stats(out);
}

/// A client's handle on a shared level.
#[derive(Debug)]
pub struct SharedPort {
    name: String,
    level: SharedLevel,
}

impl SharedPort {
    /// Creates a handle named `name` on `level`.
    pub fn new(name: impl Into<String>, level: SharedLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

impl MemObject for SharedPort {
    fn access(&mut self, req: &mut MemReq) -> u64 {
        lock(&self.level).access(req)
    }

    fn invalidate(&mut self, req: &InvReq) -> u64 {
        lock(&self.level).invalidate(req)
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Shared levels are reported once by their owner, not by every client.
    fn collect_stats(&self, _out: &mut Vec<NamedStats>) {}
}
