//! Stimulus descriptors and test outcomes.
//!
//! A [`TestVector`] is the transient description of one test: operands, operation, debug
//! mode, expected result and optional exception code, plus the clock budget. Vectors can
//! be written by hand or loaded in bulk from JSON:
//!
//! ```json
//! [
//!   { "name": "1.0 + 1.0", "din1": 15360, "din2": 15360, "expected": 16384 },
//!   { "name": "inf * 0", "din1": 31744, "din2": 0, "expected": 32256,
//!     "op": "mult", "expected_exception": 1, "max_cycles": 48 }
//! ]
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::HarnessError;

/// Arithmetic operation selected by the OPT line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Floating-point addition (OPT low).
    #[default]
    Add,
    /// Floating-point multiplication (OPT high).
    #[serde(alias = "mul")]
    Mult,
}

impl Operation {
    /// Level of the OPT line for this operation.
    pub const fn bit(self) -> bool {
        matches!(self, Self::Mult)
    }

    /// Decodes an OPT line level.
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Mult } else { Self::Add }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Mult => write!(f, "mult"),
        }
    }
}

/// Value on the 3-bit debug mode selector.
///
/// Any 3-bit value may be driven; the named constants are the modes the DUT documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct DebugMode(u8);

impl DebugMode {
    /// Debug bus idle.
    pub const OFF: Self = Self(0b000);
    /// Debug bus mirrors the adder pipeline.
    pub const ADDER: Self = Self(0b001);
    /// Debug bus mirrors the multiplier pipeline.
    pub const MULT: Self = Self(0b101);

    /// Creates a mode from the low three bits of `raw`.
    pub const fn new(raw: u8) -> Self {
        Self(raw & 0b111)
    }

    /// The 3-bit selector value.
    pub const fn bits(self) -> u8 {
        self.0 & 0b111
    }

    /// Returns `true` when the debug bus is idle.
    pub const fn is_off(self) -> bool {
        self.bits() == Self::OFF.0
    }
}

/// One test: stimulus, expectation and budget.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TestVector {
    /// Label used in diagnostics.
    pub name: String,
    /// First operand.
    pub din1: u16,
    /// Second operand.
    pub din2: u16,
    /// Expected result.
    pub expected: u16,
    /// Operation to perform.
    #[serde(default)]
    pub op: Operation,
    /// Debug mode to select.
    #[serde(default)]
    pub debug_mode: DebugMode,
    /// Exception code to require; `None` ignores the exception field.
    #[serde(default)]
    pub expected_exception: Option<u8>,
    /// Clock budget; `None` uses the configured default.
    #[serde(default)]
    pub max_cycles: Option<u16>,
    /// Dump DUT state on every cycle.
    #[serde(default)]
    pub verbose: bool,
}

impl TestVector {
    /// Creates a vector with debug off, no exception check and the default budget.
    pub fn new(name: impl Into<String>, op: Operation, din1: u16, din2: u16, expected: u16) -> Self {
        Self {
            name: name.into(),
            din1,
            din2,
            expected,
            op,
            debug_mode: DebugMode::OFF,
            expected_exception: None,
            max_cycles: None,
            verbose: false,
        }
    }

    /// Requires the exception field to equal `code`.
    #[must_use]
    pub const fn with_exception(mut self, code: u8) -> Self {
        self.expected_exception = Some(code);
        self
    }

    /// Sets the clock budget.
    #[must_use]
    pub const fn with_max_cycles(mut self, max_cycles: u16) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Selects a debug mode.
    #[must_use]
    pub const fn with_debug_mode(mut self, mode: DebugMode) -> Self {
        self.debug_mode = mode;
        self
    }

    /// Enables per-cycle dumps.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Parses a JSON array of vectors.
///
/// # Errors
///
/// Returns [`HarnessError::Json`] if the input is not a well-formed vector list.
pub fn load_vectors(json: &str) -> Result<Vec<TestVector>, HarnessError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a JSON array of vectors from a file.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if the file cannot be read, otherwise the errors of
/// [`load_vectors`].
pub fn load_vectors_file(path: impl AsRef<Path>) -> Result<Vec<TestVector>, HarnessError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_vectors(&json)
}

/// Terminal state of one test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Result (and exception code, if checked) matched.
    Passed {
        /// Clock pulses issued before data-ready was seen.
        cycles: u16,
        /// Captured result.
        result: u16,
        /// Captured exception code.
        exception: u8,
    },
    /// Data-ready never asserted within the budget.
    Timeout {
        /// Clock pulses issued (the whole budget).
        cycles: u16,
    },
    /// Data-ready asserted with the wrong result or exception code.
    Mismatch {
        /// Clock pulses issued before data-ready was seen.
        cycles: u16,
        /// Expected result.
        expected: u16,
        /// Captured result.
        result: u16,
        /// Expected exception code, if checked.
        expected_exception: Option<u8>,
        /// Captured exception code.
        exception: u8,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Passed`].
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Clock pulses issued during the run.
    pub const fn cycles(&self) -> u16 {
        match *self {
            Self::Passed { cycles, .. } | Self::Timeout { cycles } | Self::Mismatch { cycles, .. } => {
                cycles
            }
        }
    }

    /// Returns `true` for a mismatch where the result was right but the exception code
    /// was not.
    pub const fn is_exception_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { expected, result, .. } if *expected == *result)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Passed {
                cycles,
                result,
                exception,
            } => write!(
                f,
                "PASS after {cycles} cycles (result {result:#06x}, exc {exception:#05b})"
            ),
            Self::Timeout { cycles } => write!(f, "FAIL: no data-ready after {cycles} cycles"),
            Self::Mismatch {
                cycles,
                expected,
                result,
                expected_exception,
                exception,
            } => {
                write!(
                    f,
                    "FAIL after {cycles} cycles: expected {expected:#06x}, got {result:#06x}"
                )?;
                if let Some(code) = expected_exception {
                    write!(f, "; expected exc {code:#05b}, got {exception:#05b}")?;
                }
                Ok(())
            }
        }
    }
}
