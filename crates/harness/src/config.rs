//! Configuration for the harness.
//!
//! This module defines the structures used to parameterize a bench setup. It provides:
//! 1. **Defaults:** The reference board's pin assignment and run defaults.
//! 2. **Structures:** Pin assignment per chain, per-field bit order and run options.
//! 3. **Loading:** JSON parsing from strings or files, with pin-ownership validation.
//!
//! Signal offsets inside the chains are fixed by the DUT wiring and live in
//! [`sequencer::signals`](crate::sequencer::signals); they are deliberately not configurable.
//!
//! # Example
//!
//! ```
//! use fpu_harness::config::HarnessConfig;
//!
//! let json = r#"{ "order": { "dout": "reversed" }, "general": { "max_cycles": 64 } }"#;
//! let config = HarnessConfig::from_json(json).unwrap();
//! assert_eq!(config.general.max_cycles, 64);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::bits::BitOrder;
use crate::chain::{CapturePins, DrivePins};
use crate::common::{HarnessError, Pin};

/// Default configuration constants for the harness.
///
/// These values describe the reference bench board and apply whenever a JSON
/// configuration leaves a field out.
mod defaults {
    use crate::common::Pin;

    /// Capture chain serial output (host input).
    pub const CAPTURE_SERIAL_OUT: Pin = Pin(2);

    /// Capture chain active-low parallel-load strobe.
    pub const CAPTURE_PARALLEL_LOAD: Pin = Pin(3);

    /// Capture chain shift clock.
    pub const CAPTURE_SHIFT_CLOCK: Pin = Pin(4);

    /// Drive chain serial input.
    pub const DRIVE_SERIAL_IN: Pin = Pin(8);

    /// Drive chain active-low output enable.
    pub const DRIVE_OUTPUT_ENABLE: Pin = Pin(9);

    /// Drive chain storage clock.
    pub const DRIVE_STORAGE_CLOCK: Pin = Pin(10);

    /// Drive chain shift clock.
    pub const DRIVE_SHIFT_CLOCK: Pin = Pin(11);

    /// Drive chain active-low master reset.
    pub const DRIVE_MASTER_RESET: Pin = Pin(12);

    /// Clock budget used by vectors that do not specify one.
    ///
    /// The adder and multiplier both finish well inside this many functional clocks.
    pub const MAX_CYCLES: u16 = 32;
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessConfig {
    /// Host pin assignment for both chains.
    #[serde(default)]
    pub pins: PinConfig,

    /// Bit order of the wide data fields.
    #[serde(default)]
    pub order: FieldOrder,

    /// Run options.
    #[serde(default)]
    pub general: GeneralConfig,
}

impl HarnessConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Json`] for malformed input and
    /// [`HarnessError::DuplicatePin`] if a pin is claimed twice.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the file cannot be read, otherwise the errors of
    /// [`HarnessConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks that each control line has a pin of its own.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DuplicatePin`] naming the first pin claimed twice.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let mut seen: HashSet<Pin> = HashSet::new();
        for pin in self.pins.capture.all().into_iter().chain(self.pins.drive.all()) {
            if !seen.insert(pin) {
                return Err(HarnessError::DuplicatePin(pin.val()));
            }
        }
        Ok(())
    }
}

/// Host pin assignment for both chains.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PinConfig {
    /// Capture chain pins.
    #[serde(default)]
    pub capture: CapturePins,

    /// Drive chain pins.
    #[serde(default)]
    pub drive: DrivePins,
}

impl Default for CapturePins {
    fn default() -> Self {
        Self {
            serial_out: defaults::CAPTURE_SERIAL_OUT,
            parallel_load: defaults::CAPTURE_PARALLEL_LOAD,
            shift_clock: defaults::CAPTURE_SHIFT_CLOCK,
        }
    }
}

impl Default for DrivePins {
    fn default() -> Self {
        Self {
            serial_in: defaults::DRIVE_SERIAL_IN,
            output_enable: defaults::DRIVE_OUTPUT_ENABLE,
            storage_clock: defaults::DRIVE_STORAGE_CLOCK,
            shift_clock: defaults::DRIVE_SHIFT_CLOCK,
            master_reset: defaults::DRIVE_MASTER_RESET,
        }
    }
}

/// Bit order of each wide data field.
///
/// All three are wired forward on the reference board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FieldOrder {
    /// First operand on the drive chain.
    #[serde(default)]
    pub din1: BitOrder,

    /// Second operand on the drive chain.
    #[serde(default)]
    pub din2: BitOrder,

    /// Result on the capture chain.
    #[serde(default)]
    pub dout: BitOrder,
}

/// Run options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Clock budget for vectors that leave it unspecified.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u16,

    /// Dump DUT state to the diagnostic stream on every cycle.
    #[serde(default)]
    pub verbose: bool,

    /// Level driven on the DUT's clock divider select while a test runs.
    #[serde(default)]
    pub clock_divider: bool,
}

impl GeneralConfig {
    /// Returns the default clock budget.
    const fn default_max_cycles() -> u16 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            verbose: false,
            clock_divider: false,
        }
    }
}
