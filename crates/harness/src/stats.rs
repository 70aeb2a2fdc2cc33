//! Run statistics collection and reporting.
//!
//! This module tracks the verdicts of a harness session. It provides:
//! 1. **Verdicts:** Passes, timeouts, result mismatches and exception-only mismatches.
//! 2. **Handshake runs:** Attempts and completions of the parallel request test.
//! 3. **Time:** Functional clock pulses issued and wall-clock duration.

use std::fmt;
use std::time::{Duration, Instant};

use crate::sequencer::Outcome;

/// Counters for one harness session.
#[derive(Clone, Debug)]
pub struct HarnessStats {
    start_time: Instant,
    /// Arithmetic tests run.
    pub tests_run: u64,
    /// Arithmetic tests that passed.
    pub passed: u64,
    /// Arithmetic tests that never saw data-ready.
    pub timeouts: u64,
    /// Arithmetic tests with a wrong result.
    pub result_mismatches: u64,
    /// Arithmetic tests with the right result but a wrong exception code.
    pub exception_mismatches: u64,
    /// Parallel request tests run.
    pub handshake_runs: u64,
    /// Parallel request tests that completed.
    pub handshake_passed: u64,
    /// Functional clock pulses issued.
    pub clock_pulses: u64,
}

impl Default for HarnessStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessStats {
    /// Creates zeroed counters, starting the session clock now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            tests_run: 0,
            passed: 0,
            timeouts: 0,
            result_mismatches: 0,
            exception_mismatches: 0,
            handshake_runs: 0,
            handshake_passed: 0,
            clock_pulses: 0,
        }
    }

    /// Folds one arithmetic test outcome into the counters.
    pub fn record(&mut self, outcome: &Outcome) {
        self.tests_run += 1;
        match outcome {
            Outcome::Passed { .. } => self.passed += 1,
            Outcome::Timeout { .. } => self.timeouts += 1,
            Outcome::Mismatch { .. } if outcome.is_exception_mismatch() => {
                self.exception_mismatches += 1;
            }
            Outcome::Mismatch { .. } => self.result_mismatches += 1,
        }
    }

    /// Records one parallel request test.
    pub fn record_handshake(&mut self, passed: bool, cycles: u16) {
        self.handshake_runs += 1;
        if passed {
            self.handshake_passed += 1;
        }
        tracing::trace!(passed, cycles, "handshake recorded");
    }

    /// Failed tests of either kind.
    pub const fn failures(&self) -> u64 {
        (self.tests_run - self.passed) + (self.handshake_runs - self.handshake_passed)
    }

    /// Returns `true` if nothing has failed.
    pub const fn all_passed(&self) -> bool {
        self.failures() == 0
    }

    /// Wall-clock time since the counters were created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for HarnessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "FPU HARNESS SUMMARY")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {:.4} s", self.elapsed().as_secs_f64())?;
        writeln!(f, "clock_pulses             {}", self.clock_pulses)?;
        writeln!(f, "tests_run                {}", self.tests_run)?;
        writeln!(f, "  passed                 {}", self.passed)?;
        writeln!(f, "  timeouts               {}", self.timeouts)?;
        writeln!(f, "  result_mismatches      {}", self.result_mismatches)?;
        writeln!(f, "  exception_mismatches   {}", self.exception_mismatches)?;
        writeln!(f, "handshake_runs           {}", self.handshake_runs)?;
        writeln!(f, "  completed              {}", self.handshake_passed)?;
        write!(f, "failures                 {}", self.failures())
    }
}
