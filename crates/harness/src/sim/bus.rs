//! Pin-level model of the two shift chains.
//!
//! The drive chain behaves like cascaded serial-in, latched-output registers: the master
//! reset clears the shift stage while low, a rising shift clock moves every bit up one
//! place and enters the serial input at index 0, and a rising storage clock copies the
//! shift stage into the output latch. The outputs reach the DUT only while the active-low
//! enable is asserted; a disabled chain reads as all zero.
//!
//! The capture chain behaves like cascaded parallel-in, serial-out registers: a low
//! parallel-load strobe snapshots the DUT outputs, the serial output presents the most
//! significant remaining bit, and each rising shift clock (with the strobe released)
//! advances by one. Once every bit has left, the serial output reads low.

use std::collections::HashMap;

use super::Dut;
use crate::bits::{BitVector, CAPACITY};
use crate::chain::{CapturePins, DrivePins, PinBus};
use crate::common::{Level, Pin, PinMode};
use crate::config::PinConfig;
use crate::sequencer::signals::drive;

/// One recorded pin write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinEvent {
    /// Pin written.
    pub pin: Pin,
    /// Level driven.
    pub level: Level,
}

/// Simulated pin bus wired to both chains and a device model.
#[derive(Debug)]
pub struct SimBus<D> {
    capture_pins: CapturePins,
    drive_pins: DrivePins,
    levels: HashMap<Pin, Level>,
    modes: HashMap<Pin, PinMode>,
    shift_stage: BitVector,
    output_latch: BitVector,
    outputs_enabled: bool,
    presented: BitVector,
    capture_stage: BitVector,
    capture_shifted: usize,
    dut: D,
    trace: Option<Vec<PinEvent>>,
}

impl<D: Dut> SimBus<D> {
    /// Wires `dut` behind chains using the pins in `pins`.
    pub fn new(pins: PinConfig, dut: D) -> Self {
        Self {
            capture_pins: pins.capture,
            drive_pins: pins.drive,
            levels: HashMap::new(),
            modes: HashMap::new(),
            shift_stage: BitVector::new(),
            output_latch: BitVector::new(),
            outputs_enabled: false,
            presented: BitVector::new(),
            capture_stage: BitVector::new(),
            capture_shifted: 0,
            dut,
            trace: None,
        }
    }

    /// Starts recording every pin write, discarding any previous recording.
    pub fn start_trace(&mut self) {
        self.trace = Some(Vec::new());
    }

    /// Stops recording and returns the writes recorded so far.
    pub fn take_trace(&mut self) -> Vec<PinEvent> {
        self.trace.take().unwrap_or_default()
    }

    /// The device model.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Mutable access to the device model.
    pub const fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// Last level written to `pin` (low if never written).
    pub fn level(&self, pin: Pin) -> Level {
        self.levels.get(&pin).copied().unwrap_or_default()
    }

    /// Configured direction of `pin`, if any.
    pub fn mode(&self, pin: Pin) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    /// Contents of the drive chain's output latch.
    pub const fn output_latch(&self) -> &BitVector {
        &self.output_latch
    }

    /// Contents of the drive chain's shift stage.
    pub const fn shift_stage(&self) -> &BitVector {
        &self.shift_stage
    }

    /// Whether the drive chain outputs are enabled.
    pub const fn outputs_enabled(&self) -> bool {
        self.outputs_enabled
    }

    /// Inputs the DUT currently sees.
    pub const fn presented(&self) -> &BitVector {
        &self.presented
    }

    fn shift_in(&mut self, serial_in: Level) {
        let mut bytes = *self.shift_stage.as_bytes();
        let mut carry = u8::from(serial_in.is_high());
        for byte in &mut bytes {
            let out = *byte >> 7;
            *byte = (*byte << 1) | carry;
            carry = out;
        }
        self.shift_stage.set_bytes(&bytes);
    }

    fn present(&mut self) {
        let visible = if self.outputs_enabled {
            self.output_latch
        } else {
            BitVector::new()
        };
        if visible == self.presented {
            return;
        }
        let clock_edge = !self.presented.bit(drive::CLK) && visible.bit(drive::CLK);
        self.presented = visible;
        self.dut.update(&visible, clock_edge);
    }
}

impl<D: Dut> PinBus for SimBus<D> {
    fn set_mode(&mut self, pin: Pin, mode: PinMode) {
        let _ = self.modes.insert(pin, mode);
    }

    fn write(&mut self, pin: Pin, level: Level) {
        let previous = self.levels.insert(pin, level).unwrap_or_default();
        let rising = previous.is_low() && level.is_high();
        if let Some(trace) = self.trace.as_mut() {
            trace.push(PinEvent { pin, level });
        }

        let d = self.drive_pins;
        let c = self.capture_pins;
        if pin == d.master_reset {
            if level.is_low() {
                self.shift_stage.clear();
            }
        } else if pin == d.shift_clock {
            if rising && self.level(d.master_reset).is_high() {
                self.shift_in(self.level(d.serial_in));
            }
        } else if pin == d.storage_clock {
            if rising {
                self.output_latch = self.shift_stage;
                self.present();
            }
        } else if pin == d.output_enable {
            self.outputs_enabled = level.is_low();
            self.present();
        } else if pin == c.parallel_load {
            if level.is_low() {
                self.capture_stage = self.dut.outputs();
                self.capture_shifted = 0;
            }
        } else if pin == c.shift_clock
            && rising
            && self.level(c.parallel_load).is_high()
            && self.capture_shifted < CAPACITY
        {
            self.capture_shifted += 1;
        }
    }

    fn read(&mut self, pin: Pin) -> Level {
        if pin != self.capture_pins.serial_out {
            return self.level(pin);
        }
        if self.capture_shifted < CAPACITY {
            Level::from(self.capture_stage.bit(CAPACITY - 1 - self.capture_shifted))
        } else {
            Level::Low
        }
    }
}
