//! Register-backed bit storage.
//!
//! This module provides the storage shared by both shift chains:
//! 1. **Vector:** `BitVector`, an 80-bit value backed by ten 8-bit registers.
//! 2. **Order:** `BitOrder`, selecting how a packed field maps onto vector indices.
//! 3. **Rendering:** Register grid, raw bitstring and field views for diagnostics.

/// Human-readable renderings of a bit vector.
pub mod render;

/// The bit vector and its geometry constants.
pub mod vector;

use serde::Deserialize;

pub use render::{FieldBits, RawBits, RegisterGrid};
pub use vector::{BitVector, CAPACITY, MAX_FIELD_WIDTH, REGISTER_COUNT, REGISTER_WIDTH};

/// Mapping between a packed field value and consecutive vector indices.
///
/// Different DUT buses are wired with opposite significance, so each field carries its
/// own order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitOrder {
    /// Field bit 0 sits at the field's first index.
    #[default]
    Forward,
    /// Field bit 0 sits at the field's last index.
    Reversed,
}

impl BitOrder {
    /// Vector index holding field bit `bit` of a field at `start` with width `count`.
    #[inline(always)]
    pub const fn index_of(self, start: usize, count: usize, bit: usize) -> usize {
        match self {
            Self::Forward => start + bit,
            Self::Reversed => start + count - 1 - bit,
        }
    }

    /// Returns `true` for [`BitOrder::Reversed`].
    #[inline(always)]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Reversed)
    }
}

impl From<bool> for BitOrder {
    /// Converts a `reverse` flag into an order.
    fn from(reverse: bool) -> Self {
        if reverse { Self::Reversed } else { Self::Forward }
    }
}
