//! Software model of the bench.
//!
//! This module stands in for the physical board so the harness can run without hardware.
//! It provides:
//! 1. **Bus:** `SimBus`, a [`PinBus`](crate::chain::PinBus) that models the drive chain
//!    (shift stage, output latch, output enable) and the capture chain (parallel load,
//!    serial shift) at the level of individual pin edges.
//! 2. **DUT:** The `Dut` trait a device model implements to see the latched inputs and
//!    present its outputs.
//! 3. **Scripted device:** `ScriptedDut`, a configurable model of the FPU's handshake
//!    timing with a pluggable arithmetic response.

/// Pin-level model of both shift chains.
pub mod bus;

/// Scriptable device model.
pub mod scripted;

use crate::bits::BitVector;

pub use bus::{PinEvent, SimBus};
pub use scripted::{Request, Response, ScriptedDut};

/// A device attached behind the shift chains.
pub trait Dut {
    /// Called whenever the inputs presented by the drive chain change.
    ///
    /// `clock_edge` is `true` when the functional clock line rose in this change. Inputs
    /// read as all zero while the drive chain outputs are disabled.
    fn update(&mut self, inputs: &BitVector, clock_edge: bool);

    /// Current output pins, sampled by the capture chain's parallel load.
    fn outputs(&self) -> BitVector;
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn update(&mut self, inputs: &BitVector, clock_edge: bool) {
        (**self).update(inputs, clock_edge);
    }

    fn outputs(&self) -> BitVector {
        (**self).outputs()
    }
}
