//! Unit tests, one suite per library module.




/// Fail-fast reporting on out-of-range access.
pub mod fatal;

/// Test sequencing against the simulated bench.
pub mod sequencer;
