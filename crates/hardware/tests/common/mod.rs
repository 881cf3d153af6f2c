//! Shared test infrastructure.

/// Configurations, contexts, and wired cores for tests.
pub mod harness;

/// Mock implementations of hierarchy and synchronization components.
pub mod mocks;
