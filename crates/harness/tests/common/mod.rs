//! Shared test infrastructure.

/// Sequencer test context backed by the simulated bench.
pub mod harness;

/// Mock pin buses and device models.
pub mod mocks;
