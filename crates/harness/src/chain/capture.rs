//! Capture chain (parallel-in, serial-out).
//!
//! Ten 8-bit registers are daisy-chained so that the most significant bit of the last
//! register appears first on the serial output. A read latches every DUT output at once
//! with the parallel-load strobe, then clocks the chain out bit by bit.
//!
//! # Pins
//!
//! * `serial_out`: chain serial output, sampled by the host.
//! * `parallel_load`: active-low load strobe.
//! * `shift_clock`: advances the chain on its rising edge.

use serde::Deserialize;

use super::PinBus;
use crate::bits::{BitVector, REGISTER_COUNT, REGISTER_WIDTH};
use crate::common::{Level, Pin, PinMode};

/// Host pins owned by a [`CaptureChain`].
///
/// Omitted pins keep the reference board's assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CapturePins {
    /// Chain serial output (host input).
    pub serial_out: Pin,
    /// Active-low parallel-load strobe.
    pub parallel_load: Pin,
    /// Shift clock.
    pub shift_clock: Pin,
}

impl CapturePins {
    /// Returns every pin in declaration order.
    pub const fn all(&self) -> [Pin; 3] {
        [self.serial_out, self.parallel_load, self.shift_clock]
    }
}

/// Controller for the capture chain.
#[derive(Clone, Debug)]
pub struct CaptureChain {
    pins: CapturePins,
}

impl CaptureChain {
    /// Claims `pins` on `bus` and parks the shift clock low.
    pub fn new<B: PinBus + ?Sized>(bus: &mut B, pins: CapturePins) -> Self {
        bus.set_mode(pins.serial_out, PinMode::Input);
        bus.set_mode(pins.parallel_load, PinMode::Output);
        bus.set_mode(pins.shift_clock, PinMode::Output);

        bus.write(pins.shift_clock, Level::High);
        bus.write(pins.shift_clock, Level::Low);

        Self { pins }
    }

    /// Returns the pins this chain owns.
    pub const fn pins(&self) -> CapturePins {
        self.pins
    }

    /// Latches the DUT outputs and shifts them into `into`, overwriting every bit.
    ///
    /// Bits leave the chain most significant first, starting with the last register, and
    /// are stored at their natural positions: the final bit shifted out lands at index 0.
    pub fn read<B: PinBus + ?Sized>(&self, bus: &mut B, into: &mut BitVector) {
        bus.pulse(self.pins.parallel_load, Level::Low);

        for reg in (0..REGISTER_COUNT).rev() {
            let mut byte = 0u8;
            for bit in (0..REGISTER_WIDTH).rev() {
                if bus.read(self.pins.serial_out).is_high() {
                    byte |= 1 << bit;
                }
                bus.pulse(self.pins.shift_clock, Level::High);
            }
            into.set_byte(reg, byte);
        }

        tracing::trace!(captured = %into, "capture chain read");
    }

    /// Convenience wrapper around [`CaptureChain::read`] returning a fresh vector.
    pub fn capture<B: PinBus + ?Sized>(&self, bus: &mut B) -> BitVector {
        let mut vector = BitVector::new();
        self.read(bus, &mut vector);
        vector
    }
}
