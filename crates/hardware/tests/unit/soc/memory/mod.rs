//! Main memory tests.


/// Permissions, counters, and timing records of main memory.
pub mod main_memory;
