//! Mock implementations of the harness seams.

/// Device models: a mockall mock and a fixed-pattern device.
pub mod dut;

/// Mockall mock of the pin bus.
pub mod pin_bus;
