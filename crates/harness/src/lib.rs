//! Shift-register bus harness for a hardware floating-point unit.
//!
//! This crate drives stimulus into, and captures results out of, an FPU device under test
//! (DUT) wired behind two chains of 8-bit shift registers. It provides the following:
//! 1. **Bits:** An 80-bit, register-backed `BitVector` with bit, field and byte access.
//! 2. **Chains:** The capture chain (parallel-in, serial-out) and drive chain
//!    (serial-in, latched parallel-out) controllers, built on a `PinBus` context.
//! 3. **Sequencer:** The load/clock/poll/judge test protocol and its signal map.
//! 4. **Simulation:** A software model of both chains and a pluggable DUT for running
//!    the harness without hardware.
//! 5. **Support:** Configuration, run statistics and the fail-fast diagnostic path.

/// Register-backed bit vector and its diagnostic renderings.
pub mod bits;
/// Capture and drive chain controllers and the pin bus they share.
pub mod chain;
/// Common types (pins, errors, fail-fast reporting).
pub mod common;
/// Harness configuration (pins, field bit order, run defaults).
pub mod config;
/// Test sequencing: signal map, stimulus descriptors and the test protocol.
pub mod sequencer;
/// Software model of the shift chains and the device under test.
pub mod sim;
/// Pass/fail statistics collection and reporting.
pub mod stats;

/// Fixed-capacity bit vector shared by both chains.
pub use crate::bits::BitVector;
/// Chain controllers and the pin bus trait they drive.
pub use crate::chain::{CaptureChain, DriveChain, PinBus};
/// Root configuration type; use `HarnessConfig::default()` or load from JSON.
pub use crate::config::HarnessConfig;
/// Test protocol driver and its stimulus/outcome types.
pub use crate::sequencer::{Outcome, TestSequencer, TestVector};
