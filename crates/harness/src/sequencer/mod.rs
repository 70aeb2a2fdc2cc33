//! Test sequencing.
//!
//! This module implements the protocol that exercises the DUT through the shift chains:
//! 1. **Load:** Assemble the stimulus on the drive chain, hold the DUT in reset, then
//!    release reset and assert chip select.
//! 2. **Run:** Pulse the functional clock, capturing and decoding the handshake lines after
//!    every pulse, until data-ready or the clock budget runs out.
//! 3. **Judge:** Compare the captured result (and optionally the exception code).
//! 4. **Release:** Drop chip select and strobe data-out-available if a result was taken.
//!
//! The only wait is the bounded pulse-and-poll loop; there is no other timeout and no
//! retry. A timeout or a wrong answer is an ordinary [`Outcome`], never a fault.

/// Handshake line decoding.
pub mod handshake;
/// Bit offsets of every DUT signal inside the chains.
pub mod signals;
/// Stimulus descriptors and test outcomes.
pub mod vector;

use std::io::{self, Write};

use crate::bits::{BitOrder, BitVector};
use crate::chain::{CaptureChain, DriveChain, OutputState, PinBus};
use crate::config::HarnessConfig;
use crate::stats::HarnessStats;

pub use handshake::Handshake;
pub use vector::{DebugMode, Operation, Outcome, TestVector, load_vectors, load_vectors_file};

use signals::{capture, drive};

/// Where the sequencer is within a single test.
///
/// Terminal states are reported as [`Outcome`]s; once a test ends the sequencer is back
/// in [`SequencerState::Idle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SequencerState {
    /// No test in progress.
    #[default]
    Idle,
    /// Pulsing the clock and polling handshake lines.
    Running,
}

/// Progress of the parallel request handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestPhase {
    /// Request raised, waiting for acknowledge.
    AwaitAck(Operation),
    /// Request dropped, waiting for acknowledge to fall.
    AwaitRelease(Operation),
    /// Both requests complete, waiting for the units to go idle.
    Drain,
    /// Protocol complete.
    Done,
}

/// Drives tests through the two chains of one bench.
///
/// The sequencer owns the pin bus, both chain controllers, the last driven and captured
/// vectors, and a diagnostic writer standing in for the bench console.
#[derive(Debug)]
pub struct TestSequencer<B, W = io::Stdout> {
    bus: B,
    capture: CaptureChain,
    drive: DriveChain,
    driven: BitVector,
    captured: BitVector,
    config: HarnessConfig,
    console: W,
    state: SequencerState,
    stats: HarnessStats,
}

impl<B: PinBus> TestSequencer<B> {
    /// Creates a sequencer writing diagnostics to stdout.
    pub fn new(bus: B, config: HarnessConfig) -> Self {
        Self::with_console(bus, config, io::stdout())
    }
}

impl<B: PinBus, W: Write> TestSequencer<B, W> {
    /// Creates a sequencer writing diagnostics to `console`.
    ///
    /// Both chains claim their pins on `bus`; the drive chain comes up with its outputs
    /// disabled.
    pub fn with_console(mut bus: B, config: HarnessConfig, console: W) -> Self {
        let capture = CaptureChain::new(&mut bus, config.pins.capture);
        let drive = DriveChain::new(&mut bus, config.pins.drive);
        Self {
            bus,
            capture,
            drive,
            driven: BitVector::new(),
            captured: BitVector::new(),
            config,
            console,
            state: SequencerState::Idle,
            stats: HarnessStats::new(),
        }
    }

    /// The pin bus.
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the pin bus.
    pub const fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// The diagnostic writer.
    pub const fn console(&self) -> &W {
        &self.console
    }

    /// The active configuration.
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Statistics for every test run so far.
    pub const fn stats(&self) -> &HarnessStats {
        &self.stats
    }

    /// Current protocol state.
    pub const fn state(&self) -> SequencerState {
        self.state
    }

    /// The vector most recently shifted onto the DUT inputs.
    pub const fn driven(&self) -> &BitVector {
        &self.driven
    }

    /// The vector most recently captured from the DUT outputs.
    pub const fn captured(&self) -> &BitVector {
        &self.captured
    }

    /// Consumes the sequencer, returning the bus and the diagnostic writer.
    pub fn into_parts(self) -> (B, W) {
        (self.bus, self.console)
    }

    /// Runs one arithmetic test and reports whether it passed.
    ///
    /// `opt` selects the operation from its low bit and `debug_mode` the debug mode from
    /// its low three bits. When `check_exc` is set the exception field must equal
    /// `exc_code` as well. A timeout and a mismatch both return `false`; use
    /// [`TestSequencer::run_vector`] to tell them apart.
    pub fn run_test(
        &mut self,
        din1: u16,
        din2: u16,
        expected_val: u16,
        opt: u16,
        debug_mode: u16,
        check_exc: bool,
        exc_code: u16,
        max_cycles: u16,
        test_name: &str,
        verbose: bool,
    ) -> bool {
        let vector = TestVector {
            name: test_name.to_owned(),
            din1,
            din2,
            expected: expected_val,
            op: Operation::from_bit(opt & 1 == 1),
            debug_mode: DebugMode::new(u8::try_from(debug_mode & 0b111).unwrap_or_default()),
            // A code wider than the field can never match.
            expected_exception: check_exc.then(|| u8::try_from(exc_code).unwrap_or(u8::MAX)),
            max_cycles: Some(max_cycles),
            verbose,
        };
        self.run_vector(&vector).is_pass()
    }

    /// Runs one arithmetic test and returns its terminal state.
    pub fn run_vector(&mut self, vector: &TestVector) -> Outcome {
        let max_cycles = vector.max_cycles.unwrap_or(self.config.general.max_cycles);
        let verbose = vector.verbose || self.config.general.verbose;
        let span = tracing::info_span!("run_test", name = %vector.name, op = %vector.op);
        let _enter = span.enter();

        if verbose {
            let header = writeln!(
                self.console,
                "=== {}: {} {:#06x}, {:#06x} (expect {:#06x}) ===",
                vector.name, vector.op, vector.din1, vector.din2, vector.expected
            );
            self.note_console(header);
        }

        self.load(vector.din1, vector.din2, vector.op, vector.debug_mode);
        let outcome = self.poll_result(vector, max_cycles, verbose);
        self.release(!matches!(outcome, Outcome::Timeout { .. }));
        self.stats.record(&outcome);

        match outcome {
            Outcome::Passed { cycles, .. } => tracing::info!(cycles, "test passed"),
            Outcome::Timeout { cycles } => tracing::warn!(cycles, "test timed out"),
            Outcome::Mismatch {
                cycles,
                expected,
                result,
                ..
            } => tracing::warn!(cycles, expected, result, "test result mismatch"),
        }

        let line = writeln!(self.console, "{}: {outcome}", vector.name);
        self.note_console(line);
        outcome
    }

    /// Runs every vector in order, returning each outcome.
    pub fn run_vectors(&mut self, vectors: &[TestVector]) -> Vec<Outcome> {
        vectors.iter().map(|v| self.run_vector(v)).collect()
    }

    /// Exercises the request/acknowledge path without checking any result.
    ///
    /// An add request and then a multiply request each complete a four-phase handshake
    /// (request up, acknowledge up, request down, acknowledge down); the multiply is issued
    /// while the adder may still be busy. The test passes once both busy lines are low,
    /// provided all of it fits in `max_cycles` clock pulses.
    pub fn parallel_req_test(
        &mut self,
        din1: u16,
        din2: u16,
        max_cycles: u16,
        test_name: &str,
        verbose: bool,
    ) -> bool {
        let verbose = verbose || self.config.general.verbose;
        let span = tracing::info_span!("parallel_req_test", name = %test_name);
        let _enter = span.enter();

        self.load(din1, din2, Operation::Add, DebugMode::OFF);
        self.state = SequencerState::Running;

        let mut phase = RequestPhase::AwaitAck(Operation::Add);
        let mut cycles = 0;
        while cycles < max_cycles && phase != RequestPhase::Done {
            cycles += 1;
            self.pulse_clk();
            let hs = self.sample();
            tracing::debug!(cycle = cycles, %hs, ?phase, "request handshake");
            if verbose {
                let dump = self.print_dut_state(cycles, false, false, false);
                self.note_console(dump);
            }
            phase = self.advance_request(phase, hs);
        }

        let passed = phase == RequestPhase::Done;
        self.release(false);
        self.stats.record_handshake(passed, cycles);

        let verdict = if passed {
            tracing::info!(cycles, "request handshake completed");
            format!("PASS after {cycles} cycles")
        } else {
            tracing::warn!(cycles, ?phase, "request handshake timed out");
            format!("FAIL: handshake stalled in {phase:?} after {cycles} cycles")
        };
        let line = writeln!(self.console, "{test_name}: {verdict}");
        self.note_console(line);
        passed
    }

    /// Drives the functional clock high, then low: one unit of DUT time.
    pub fn pulse_clk(&mut self) {
        self.driven.set_bit(drive::CLK, true);
        self.drive_outputs();
        self.driven.set_bit(drive::CLK, false);
        self.drive_outputs();
        self.stats.clock_pulses += 1;
    }

    /// Writes the last driven vector to the diagnostic stream.
    ///
    /// # Errors
    ///
    /// Propagates write failures of the diagnostic stream.
    pub fn print_dut_inputs(&mut self) -> io::Result<()> {
        writeln!(self.console, "DUT inputs:")?;
        write!(self.console, "{}", self.driven.grid())
    }

    /// Writes the last captured vector to the diagnostic stream.
    ///
    /// # Errors
    ///
    /// Propagates write failures of the diagnostic stream.
    pub fn print_dut_outputs(&mut self) -> io::Result<()> {
        writeln!(self.console, "DUT outputs:")?;
        write!(self.console, "{}", self.captured.grid())
    }

    /// Writes a one-line summary of the last capture, optionally followed by the operand
    /// and debug fields (`verbose`) and the full input/output grids.
    ///
    /// # Errors
    ///
    /// Propagates write failures of the diagnostic stream.
    pub fn print_dut_state(
        &mut self,
        cycle: u16,
        print_in: bool,
        print_out: bool,
        verbose: bool,
    ) -> io::Result<()> {
        let order = self.config.order;
        let hs = Handshake::decode(&self.captured);
        writeln!(
            self.console,
            "cycle {cycle:>4}: {hs} DOUT={} EXC={}",
            self.captured
                .field_bits(capture::DOUT, capture::DOUT_WIDTH, order.dout),
            self.captured
                .field_bits(capture::EXC, capture::EXC_WIDTH, BitOrder::Forward)
        )?;
        if verbose {
            writeln!(
                self.console,
                "            DIN1={} DIN2={} MODE={} OPT={} DEBUG={}",
                self.driven.field_bits(drive::DIN1, drive::DIN_WIDTH, order.din1),
                self.driven.field_bits(drive::DIN2, drive::DIN_WIDTH, order.din2),
                self.driven
                    .field_bits(drive::MODE, drive::MODE_WIDTH, BitOrder::Forward),
                u8::from(self.driven.bit(drive::OPT)),
                self.captured
                    .field_bits(capture::DEBUG, capture::DEBUG_WIDTH, BitOrder::Forward)
            )?;
        }
        if print_in {
            self.print_dut_inputs()?;
        }
        if print_out {
            self.print_dut_outputs()?;
        }
        Ok(())
    }

    /// Stimulus on the outputs, DUT reset released, chip select raised. No clock yet.
    fn load(&mut self, din1: u16, din2: u16, op: Operation, mode: DebugMode) {
        let order = self.config.order;

        self.driven.clear();
        self.driven
            .set_range(drive::DIN1, drive::DIN_WIDTH, din1, order.din1);
        self.driven
            .set_range(drive::DIN2, drive::DIN_WIDTH, din2, order.din2);
        self.driven.set_bit(drive::OPT, op.bit());
        self.driven.set_range(
            drive::MODE,
            drive::MODE_WIDTH,
            u16::from(mode.bits()),
            BitOrder::Forward,
        );
        self.driven
            .set_bit(drive::DIV, self.config.general.clock_divider);

        // Shift with the outputs floating so the DUT never sees a stale mix.
        self.drive.set_output_state(&mut self.bus, OutputState::Disabled);
        self.drive_outputs();
        self.drive.set_output_state(&mut self.bus, OutputState::Enabled);

        self.driven.set_bit(drive::RST_N, true);
        self.drive_outputs();
        self.driven.set_bit(drive::CS, true);
        self.drive_outputs();

        tracing::debug!(din1, din2, %op, mode = mode.bits(), "stimulus loaded");
    }

    /// Running until data-ready or the budget runs out.
    fn poll_result(&mut self, vector: &TestVector, max_cycles: u16, verbose: bool) -> Outcome {
        self.state = SequencerState::Running;
        let debug = !vector.debug_mode.is_off();

        for cycle in 1..=max_cycles {
            self.pulse_clk();
            let hs = self.sample();
            tracing::debug!(cycle, %hs, "handshake");
            if verbose {
                let dump = self.print_dut_state(cycle, false, false, debug);
                self.note_console(dump);
            }

            if hs.data_ready {
                let result =
                    self.captured
                        .range(capture::DOUT, capture::DOUT_WIDTH, self.config.order.dout);
                let exception = u8::try_from(self.captured.range(
                    capture::EXC,
                    capture::EXC_WIDTH,
                    BitOrder::Forward,
                ))
                .unwrap_or(u8::MAX);
                let matched = result == vector.expected
                    && vector.expected_exception.is_none_or(|code| code == exception);

                return if matched {
                    Outcome::Passed {
                        cycles: cycle,
                        result,
                        exception,
                    }
                } else {
                    if verbose {
                        let dump = self.print_dut_state(cycle, true, true, true);
                        self.note_console(dump);
                    }
                    Outcome::Mismatch {
                        cycles: cycle,
                        expected: vector.expected,
                        result,
                        expected_exception: vector.expected_exception,
                        exception,
                    }
                };
            }
        }

        if verbose {
            let dump = self.print_dut_state(max_cycles, true, true, true);
            self.note_console(dump);
        }
        Outcome::Timeout { cycles: max_cycles }
    }

    /// One step of the parallel request handshake.
    fn advance_request(&mut self, phase: RequestPhase, hs: Handshake) -> RequestPhase {
        match phase {
            RequestPhase::AwaitAck(op) if hs.acknowledge => {
                self.driven.set_bit(drive::CS, false);
                self.drive_outputs();
                RequestPhase::AwaitRelease(op)
            }
            RequestPhase::AwaitRelease(Operation::Add) if !hs.acknowledge => {
                self.driven.set_bit(drive::OPT, Operation::Mult.bit());
                self.driven.set_bit(drive::CS, true);
                self.drive_outputs();
                RequestPhase::AwaitAck(Operation::Mult)
            }
            RequestPhase::AwaitRelease(Operation::Mult) if !hs.acknowledge => {
                if hs.busy() {
                    RequestPhase::Drain
                } else {
                    RequestPhase::Done
                }
            }
            RequestPhase::Drain if !hs.busy() => RequestPhase::Done,
            other => other,
        }
    }

    /// Terminal -> IDLE: drop chip select, acknowledge a taken result.
    fn release(&mut self, took_result: bool) {
        self.driven.set_bit(drive::CS, false);
        if took_result {
            self.driven.set_bit(drive::DOA, true);
            self.drive_outputs();
            self.driven.set_bit(drive::DOA, false);
        }
        self.drive_outputs();
        self.state = SequencerState::Idle;
    }

    fn drive_outputs(&mut self) {
        self.drive.write(&mut self.bus, &self.driven);
    }

    fn sample(&mut self) -> Handshake {
        self.capture.read(&mut self.bus, &mut self.captured);
        Handshake::decode(&self.captured)
    }

    fn note_console(&self, result: io::Result<()>) {
        if let Err(error) = result {
            tracing::warn!(%error, "diagnostic stream write failed");
        }
    }
}
