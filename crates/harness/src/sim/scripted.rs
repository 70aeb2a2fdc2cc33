//! Scriptable model of the FPU's external behaviour.
//!
//! The model reproduces the DUT's pin-level protocol, not its arithmetic:
//!
//! * While reset is held low every internal state is cleared.
//! * Each rising clock with chip select high counts towards `ack_after` (acknowledge) and
//!   `latency` (data ready). Acknowledging occupies the selected unit for `busy_for`
//!   clocks.
//! * Dropping chip select clears data ready and, on the next clock, the acknowledge.
//! * When data ready rises the responder computes the result from the latched operands.
//!
//! Arithmetic is delegated to a responder closure, so tests can plug in a golden model
//! or a deliberately wrong one.

use std::fmt;

use super::Dut;
use crate::bits::{BitOrder, BitVector};
use crate::config::FieldOrder;
use crate::sequencer::signals::{capture, drive};
use crate::sequencer::{DebugMode, Operation};

/// Values the model presents once data ready rises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    /// Result bus value.
    pub result: u16,
    /// Exception code (3 bits).
    pub exception: u8,
    /// Data valid / overflow line.
    pub overflow: bool,
}

impl Response {
    /// A response with no exception and no overflow.
    pub const fn value(result: u16) -> Self {
        Self {
            result,
            exception: 0,
            overflow: false,
        }
    }

    /// A response carrying an exception code.
    pub const fn with_exception(result: u16, exception: u8) -> Self {
        Self {
            result,
            exception,
            overflow: false,
        }
    }
}

type Responder = Box<dyn FnMut(Operation, u16, u16) -> Response>;

/// A request latched by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Operation selected when the request was acknowledged.
    pub op: Operation,
    /// First operand.
    pub din1: u16,
    /// Second operand.
    pub din2: u16,
    /// Debug mode selected.
    pub mode: DebugMode,
}

/// Configurable DUT model.
pub struct ScriptedDut {
    latency: Option<u16>,
    ack_after: u16,
    busy_for: u16,
    order: FieldOrder,
    responder: Responder,

    inputs: BitVector,
    in_reset: bool,
    request_cycles: u16,
    active_cycles: u16,
    acknowledged: bool,
    ready: Option<Response>,
    adder_busy: u16,
    multiplier_busy: u16,

    clock_edges: u64,
    resets: u64,
    requests: Vec<Request>,
}

impl fmt::Debug for ScriptedDut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedDut")
            .field("latency", &self.latency)
            .field("ack_after", &self.ack_after)
            .field("busy_for", &self.busy_for)
            .field("acknowledged", &self.acknowledged)
            .field("ready", &self.ready)
            .field("clock_edges", &self.clock_edges)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

impl ScriptedDut {
    /// A model that raises data ready after `latency` clocks with `response`.
    pub fn fixed(latency: u16, response: Response) -> Self {
        Self::with_responder(Some(latency), move |_, _, _| response)
    }

    /// A model that acknowledges requests but never raises data ready.
    pub fn never_ready() -> Self {
        Self::with_responder(None, |_, _, _| Response::default())
    }

    /// A model computing its response from the operands.
    pub fn with_responder<F>(latency: Option<u16>, responder: F) -> Self
    where
        F: FnMut(Operation, u16, u16) -> Response + 'static,
    {
        Self {
            latency,
            ack_after: 1,
            busy_for: 0,
            order: FieldOrder::default(),
            responder: Box::new(responder),
            inputs: BitVector::new(),
            in_reset: false,
            request_cycles: 0,
            active_cycles: 0,
            acknowledged: false,
            ready: None,
            adder_busy: 0,
            multiplier_busy: 0,
            clock_edges: 0,
            resets: 0,
            requests: Vec::new(),
        }
    }

    /// Clocks of chip select before acknowledge rises.
    #[must_use]
    pub const fn ack_after(mut self, cycles: u16) -> Self {
        self.ack_after = cycles;
        self
    }

    /// Clocks a unit stays busy after acknowledging a request.
    #[must_use]
    pub const fn busy_for(mut self, cycles: u16) -> Self {
        self.busy_for = cycles;
        self
    }

    /// Bit order of the operand and result buses.
    #[must_use]
    pub const fn field_order(mut self, order: FieldOrder) -> Self {
        self.order = order;
        self
    }

    /// Rising clock edges seen since construction, including those during reset.
    pub const fn clock_edges(&self) -> u64 {
        self.clock_edges
    }

    /// Times reset was asserted.
    pub const fn resets(&self) -> u64 {
        self.resets
    }

    /// Requests acknowledged since construction.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Inputs most recently presented.
    pub const fn inputs(&self) -> &BitVector {
        &self.inputs
    }

    fn reset(&mut self) {
        self.request_cycles = 0;
        self.active_cycles = 0;
        self.acknowledged = false;
        self.ready = None;
        self.adder_busy = 0;
        self.multiplier_busy = 0;
    }

    fn latched_request(&self) -> Request {
        Request {
            op: Operation::from_bit(self.inputs.bit(drive::OPT)),
            din1: self
                .inputs
                .range(drive::DIN1, drive::DIN_WIDTH, self.order.din1),
            din2: self
                .inputs
                .range(drive::DIN2, drive::DIN_WIDTH, self.order.din2),
            mode: DebugMode::new(
                u8::try_from(
                    self.inputs
                        .range(drive::MODE, drive::MODE_WIDTH, BitOrder::Forward),
                )
                .unwrap_or_default(),
            ),
        }
    }

    fn step(&mut self) {
        let selected = self.inputs.bit(drive::CS);

        self.adder_busy = self.adder_busy.saturating_sub(1);
        self.multiplier_busy = self.multiplier_busy.saturating_sub(1);

        if selected && !self.acknowledged {
            self.request_cycles = self.request_cycles.saturating_add(1);
            if self.request_cycles >= self.ack_after {
                let request = self.latched_request();
                self.acknowledged = true;
                match request.op {
                    Operation::Add => self.adder_busy = self.busy_for,
                    Operation::Mult => self.multiplier_busy = self.busy_for,
                }
                self.requests.push(request);
            }
        } else if !selected && self.acknowledged {
            self.acknowledged = false;
            self.request_cycles = 0;
        }

        if selected {
            self.active_cycles = self.active_cycles.saturating_add(1);
            if self.ready.is_none() && self.latency.is_some_and(|l| self.active_cycles >= l) {
                let request = self.latched_request();
                self.ready = Some((self.responder)(request.op, request.din1, request.din2));
            }
        }
    }
}

impl Dut for ScriptedDut {
    fn update(&mut self, inputs: &BitVector, clock_edge: bool) {
        self.inputs = *inputs;
        if clock_edge {
            self.clock_edges += 1;
        }

        if !inputs.bit(drive::RST_N) {
            if !self.in_reset {
                self.in_reset = true;
                self.resets += 1;
                tracing::trace!(resets = self.resets, "scripted dut reset");
            }
            self.reset();
            return;
        }
        self.in_reset = false;

        if !inputs.bit(drive::CS) {
            self.ready = None;
            self.active_cycles = 0;
        }
        if clock_edge {
            self.step();
        }
    }

    fn outputs(&self) -> BitVector {
        let mut out = BitVector::new();
        out.set_bit(capture::DACK, self.acknowledged);
        out.set_bit(capture::ABUSY, self.adder_busy > 0);
        out.set_bit(capture::MBUSY, self.multiplier_busy > 0);

        if let Some(response) = self.ready {
            out.set_bit(capture::DR, true);
            out.set_bit(capture::DOV, response.overflow);
            out.set_range(
                capture::DOUT,
                capture::DOUT_WIDTH,
                response.result,
                self.order.dout,
            );
            out.set_range(
                capture::EXC,
                capture::EXC_WIDTH,
                u16::from(response.exception),
                BitOrder::Forward,
            );
        }

        if !self.latched_request().mode.is_off() {
            out.set_range(
                capture::DEBUG,
                capture::DEBUG_WIDTH,
                self.active_cycles,
                BitOrder::Forward,
            );
        }
        out
    }
}
