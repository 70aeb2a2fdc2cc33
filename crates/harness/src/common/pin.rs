//! Pin identifiers and logic levels.
//!
//! This module defines strong types for the host-side control lines of the shift chains.
//! It provides the following:
//! 1. **Type Safety:** A `Pin` newtype so pin numbers are never confused with bit offsets.
//! 2. **Levels:** A two-valued `Level` with conversions to and from `bool`.
//! 3. **Direction:** `PinMode` for configuring a line as input or output.

use std::fmt;
use std::ops::Not;

use serde::Deserialize;

/// A host pin number driving or sensing one control line.
///
/// Pin numbers live in the host's own numbering scheme; they are unrelated to
/// bit offsets inside the shift chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Pin(pub u8);

impl Pin {
    /// Creates a pin identifier from a raw pin number.
    #[inline(always)]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Returns the raw pin number.
    #[inline(always)]
    pub const fn val(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pin {}", self.0)
    }
}

/// Logic level of a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Logic zero.
    #[default]
    Low,
    /// Logic one.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline(always)]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Returns `true` for [`Level::Low`].
    #[inline(always)]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Low)
    }
}

impl From<bool> for Level {
    #[inline(always)]
    fn from(value: bool) -> Self {
        if value { Self::High } else { Self::Low }
    }
}

impl From<Level> for bool {
    #[inline(always)]
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

impl Not for Level {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Direction of a host pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// The host samples the line.
    Input,
    /// The host drives the line.
    Output,
}
