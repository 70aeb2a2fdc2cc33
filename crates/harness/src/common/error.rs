//! Error definitions for the harness.
//!
//! Two disjoint classes of failure exist:
//! 1. **Range errors:** A bit, register or field access outside the vector. These are
//!    programming errors; the fail-fast accessors halt on them, the `try_*` accessors
//!    return them.
//! 2. **Harness errors:** Configuration and vector-file problems surfaced to the caller.
//!
//! Protocol outcomes (timeouts, mismatches) are not errors; see
//! [`Outcome`](crate::sequencer::Outcome).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An access outside the bounds of a [`BitVector`](crate::bits::BitVector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RangeError {
    /// A single-bit index at or past the capacity.
    #[error("bit index {index} out of range (capacity {capacity})")]
    Bit {
        /// Offending bit index.
        index: usize,
        /// Vector capacity in bits.
        capacity: usize,
    },

    /// A register (byte) index at or past the register count.
    #[error("register index {index} out of range ({count} registers)")]
    Register {
        /// Offending register index.
        index: usize,
        /// Number of backing registers.
        count: usize,
    },

    /// A multi-bit field that runs past the end of the vector.
    #[error("field {start}+{count} exceeds capacity {capacity}")]
    Field {
        /// First bit of the field.
        start: usize,
        /// Field width in bits.
        count: usize,
        /// Vector capacity in bits.
        capacity: usize,
    },

    /// A multi-bit field wider than the widest packable value.
    #[error("field width {count} exceeds {max} bits")]
    Width {
        /// Requested width in bits.
        count: usize,
        /// Maximum supported width.
        max: usize,
    },
}

/// Failures surfaced to callers of the configuration and vector loaders.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A configuration or vector file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON input did not match the expected schema.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration assigns one pin to two control lines.
    #[error("pin {0} is assigned to more than one control line")]
    DuplicatePin(u8),
}
