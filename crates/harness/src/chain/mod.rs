//! Shift-chain controllers.
//!
//! This module defines the `PinBus` trait the harness uses to touch host pins, and the two
//! controllers built on it. It provides:
//! 1. **Bus:** `PinBus`, the explicit context object for one physical set of pins.
//! 2. **Capture:** `CaptureChain`, loading DUT outputs through a parallel-in, serial-out chain.
//! 3. **Drive:** `DriveChain`, presenting DUT inputs through a serial-in, latched-output chain.
//!
//! Controllers hold only their pin assignments. Storage is a [`BitVector`](crate::BitVector)
//! passed to each transfer, and the bus is borrowed mutably for the duration of a transfer,
//! so two transfers can never interleave on the same pins.

/// Parallel-in, serial-out capture chain.
pub mod capture;

/// Serial-in, latched parallel-out drive chain.
pub mod drive;

use crate::common::{Level, Pin, PinMode};

pub use capture::{CaptureChain, CapturePins};
pub use drive::{DriveChain, DrivePins, OutputState};

/// Access to the host pins wired to the shift chains.
///
/// One implementor exists per physical bus: a GPIO driver on hardware, or
/// [`SimBus`](crate::sim::SimBus) in software. Every operation is blocking and completes
/// before it returns.
pub trait PinBus {
    /// Configures `pin` as an input or output.
    fn set_mode(&mut self, pin: Pin, mode: PinMode);

    /// Drives `pin` to `level`.
    fn write(&mut self, pin: Pin, level: Level);

    /// Samples `pin`.
    fn read(&mut self, pin: Pin) -> Level;

    /// Drives `pin` to `first`, then to the opposite level.
    fn pulse(&mut self, pin: Pin, first: Level) {
        self.write(pin, first);
        self.write(pin, !first);
    }
}

impl<B: PinBus + ?Sized> PinBus for &mut B {
    fn set_mode(&mut self, pin: Pin, mode: PinMode) {
        (**self).set_mode(pin, mode);
    }

    fn write(&mut self, pin: Pin, level: Level) {
        (**self).write(pin, level);
    }

    fn read(&mut self, pin: Pin) -> Level {
        (**self).read(pin)
    }

    fn pulse(&mut self, pin: Pin, first: Level) {
        (**self).pulse(pin, first);
    }
}
