//! Common types shared by every layer of the harness.
//!
//! This module provides the fundamental building blocks used by the bit vector, the chain
//! controllers and the sequencer. It includes:
//! 1. **Pins:** Strong types for pin identifiers, logic levels and pin directions.
//! 2. **Errors:** Range violations and harness-level failures.
//! 3. **Fail-fast:** The diagnostic report emitted before the harness halts.

/// Error types for range violations and harness failures.
pub mod error;

/// Fail-fast diagnostic reporting.
pub mod fatal;

/// Pin identifiers, logic levels and directions.
pub mod pin;

pub use error::{HarnessError, RangeError};
pub use fatal::{FatalReport, fail_fast};
pub use pin::{Level, Pin, PinMode};
