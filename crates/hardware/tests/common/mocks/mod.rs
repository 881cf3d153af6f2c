//! Mock components.


/// Scripted memory object and fixed-latency controller.
pub mod memory;
