//! Drive chain (serial-in, latched parallel-out).
//!
//! Bits are shifted in most significant first, so after a full transfer index 79 sits at
//! the far end of the chain and index 0 at the near end. The outputs only change when the
//! storage clock copies the shift stage into the output latch, which happens once per
//! write after the last shift; the DUT never sees a half-shifted vector.
//!
//! # Pins
//!
//! * `serial_in`: chain serial input.
//! * `output_enable`: active-low output enable.
//! * `storage_clock`: copies the shift stage to the outputs on its rising edge.
//! * `shift_clock`: advances the shift stage on its rising edge.
//! * `master_reset`: active-low clear of the shift stage.

use serde::Deserialize;

use super::PinBus;
use crate::bits::{BitVector, CAPACITY};
use crate::common::{Level, Pin, PinMode};

/// Host pins owned by a [`DriveChain`].
///
/// Omitted pins keep the reference board's assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DrivePins {
    /// Chain serial input.
    pub serial_in: Pin,
    /// Active-low output enable.
    pub output_enable: Pin,
    /// Storage (latch) clock.
    pub storage_clock: Pin,
    /// Shift clock.
    pub shift_clock: Pin,
    /// Active-low master reset.
    pub master_reset: Pin,
}

impl DrivePins {
    /// Returns every pin in declaration order.
    pub const fn all(&self) -> [Pin; 5] {
        [
            self.serial_in,
            self.output_enable,
            self.storage_clock,
            self.shift_clock,
            self.master_reset,
        ]
    }
}

/// Electrical state of the drive chain outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputState {
    /// Outputs drive the latched vector.
    Enabled,
    /// Outputs are high impedance.
    Disabled,
}

impl OutputState {
    /// Level to place on the active-low enable line.
    pub const fn enable_level(self) -> Level {
        match self {
            Self::Enabled => Level::Low,
            Self::Disabled => Level::High,
        }
    }
}

/// Controller for the drive chain.
#[derive(Clone, Debug)]
pub struct DriveChain {
    pins: DrivePins,
}

impl DriveChain {
    /// Claims `pins` on `bus` with the outputs disabled and every line idle.
    pub fn new<B: PinBus + ?Sized>(bus: &mut B, pins: DrivePins) -> Self {
        for pin in pins.all() {
            bus.set_mode(pin, PinMode::Output);
        }

        bus.write(pins.serial_in, Level::Low);
        bus.write(pins.output_enable, OutputState::Disabled.enable_level());
        bus.write(pins.storage_clock, Level::Low);
        bus.write(pins.shift_clock, Level::Low);
        bus.write(pins.master_reset, Level::High);

        Self { pins }
    }

    /// Returns the pins this chain owns.
    pub const fn pins(&self) -> DrivePins {
        self.pins
    }

    /// Enables or disables the outputs without touching the latched vector.
    pub fn set_output_state<B: PinBus + ?Sized>(&self, bus: &mut B, state: OutputState) {
        bus.write(self.pins.output_enable, state.enable_level());
    }

    /// Shifts `vector` into the chain and latches it onto the outputs.
    pub fn write<B: PinBus + ?Sized>(&self, bus: &mut B, vector: &BitVector) {
        bus.pulse(self.pins.master_reset, Level::Low);

        for index in (0..CAPACITY).rev() {
            bus.write(self.pins.serial_in, Level::from(vector.bit(index)));
            bus.pulse(self.pins.shift_clock, Level::High);
        }

        bus.pulse(self.pins.storage_clock, Level::High);

        tracing::trace!(driven = %vector, "drive chain write");
    }
}
