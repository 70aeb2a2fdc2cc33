//! Fixed-capacity bit vector.
//!
//! The vector mirrors one shift chain: ten 8-bit registers, register 0 holding bits 0-7.
//! It provides:
//! 1. **Bit access:** Single-bit read and write by absolute index.
//! 2. **Field access:** Packing and unpacking of up to 16 bits with a selectable order.
//! 3. **Register access:** Whole-byte read and write by register index.
//!
//! Every accessor comes in two flavours. The `try_*` form returns a [`RangeError`]; the
//! plain form treats a range violation as a harness defect and takes the fail-fast path,
//! so nothing is ever clamped or truncated silently.

use std::fmt;

use super::BitOrder;
use super::render::{FieldBits, RawBits, RegisterGrid};
use crate::common::{RangeError, fail_fast};

/// Number of 8-bit registers in a chain.
pub const REGISTER_COUNT: usize = 10;

/// Width of one register in bits.
pub const REGISTER_WIDTH: usize = 8;

/// Addressable bits in a chain.
pub const CAPACITY: usize = REGISTER_COUNT * REGISTER_WIDTH;

/// Widest field that can be packed into or unpacked from a `u16`.
pub const MAX_FIELD_WIDTH: usize = 16;

/// An 80-bit vector backed by ten byte-wide registers.
///
/// `BitVector` is `Copy`: cloning or constructing from a buffer duplicates storage,
/// nothing is shared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    data: [u8; REGISTER_COUNT],
}

impl BitVector {
    /// Creates an all-zero vector.
    pub const fn new() -> Self {
        Self {
            data: [0; REGISTER_COUNT],
        }
    }

    /// Creates a vector holding a copy of `bytes`, register 0 first.
    pub const fn from_bytes(bytes: [u8; REGISTER_COUNT]) -> Self {
        Self { data: bytes }
    }

    /// Number of addressable bits.
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Returns the backing registers, register 0 first.
    #[inline(always)]
    pub const fn as_bytes(&self) -> &[u8; REGISTER_COUNT] {
        &self.data
    }

    /// Overwrites every register with a copy of `bytes`.
    pub fn set_bytes(&mut self, bytes: &[u8; REGISTER_COUNT]) {
        self.data.copy_from_slice(bytes);
    }

    /// Zeroes all storage.
    pub fn clear(&mut self) {
        self.data = [0; REGISTER_COUNT];
    }

    /// Returns `true` when every bit is zero.
    pub fn is_clear(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    #[inline(always)]
    const fn check_bit(index: usize) -> Result<(), RangeError> {
        if index < CAPACITY {
            Ok(())
        } else {
            Err(RangeError::Bit {
                index,
                capacity: CAPACITY,
            })
        }
    }

    #[inline(always)]
    const fn check_field(start: usize, count: usize) -> Result<(), RangeError> {
        if count > MAX_FIELD_WIDTH {
            return Err(RangeError::Width {
                count,
                max: MAX_FIELD_WIDTH,
            });
        }
        if start > CAPACITY || count > CAPACITY - start {
            return Err(RangeError::Field {
                start,
                count,
                capacity: CAPACITY,
            });
        }
        Ok(())
    }

    #[inline(always)]
    const fn check_register(index: usize) -> Result<(), RangeError> {
        if index < REGISTER_COUNT {
            Ok(())
        } else {
            Err(RangeError::Register {
                index,
                count: REGISTER_COUNT,
            })
        }
    }

    // Callers must have validated `index`.
    #[inline(always)]
    const fn read_bit(&self, index: usize) -> bool {
        (self.data[index / REGISTER_WIDTH] >> (index % REGISTER_WIDTH)) & 1 == 1
    }

    #[inline(always)]
    const fn write_bit(&mut self, index: usize, value: bool) {
        let mask = 1u8 << (index % REGISTER_WIDTH);
        let reg = &mut self.data[index / REGISTER_WIDTH];
        if value {
            *reg |= mask;
        } else {
            *reg &= !mask;
        }
    }

    /// Returns the bit at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Bit`] if `index` is not below the capacity.
    pub const fn try_bit(&self, index: usize) -> Result<bool, RangeError> {
        match Self::check_bit(index) {
            Ok(()) => Ok(self.read_bit(index)),
            Err(e) => Err(e),
        }
    }

    /// Stores `value` at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Bit`] if `index` is not below the capacity; the vector is
    /// left untouched.
    pub fn try_set_bit(&mut self, index: usize, value: bool) -> Result<(), RangeError> {
        Self::check_bit(index)?;
        self.write_bit(index, value);
        Ok(())
    }

    /// Unpacks `count` bits starting at `start` into the low bits of a `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Width`] if `count` exceeds [`MAX_FIELD_WIDTH`], or
    /// [`RangeError::Field`] if the field runs past the end of the vector.
    pub fn try_range(&self, start: usize, count: usize, order: BitOrder) -> Result<u16, RangeError> {
        Self::check_field(start, count)?;
        Ok((0..count).fold(0u16, |acc, bit| {
            if self.read_bit(order.index_of(start, count, bit)) {
                acc | (1 << bit)
            } else {
                acc
            }
        }))
    }

    /// Packs the low `count` bits of `value` into the vector starting at `start`.
    ///
    /// Bits of `value` above `count` are ignored, so a later read yields
    /// `value mod 2^count`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BitVector::try_range`]; the vector is left untouched.
    pub fn try_set_range(
        &mut self,
        start: usize,
        count: usize,
        value: u16,
        order: BitOrder,
    ) -> Result<(), RangeError> {
        Self::check_field(start, count)?;
        for bit in 0..count {
            self.write_bit(order.index_of(start, count, bit), (value >> bit) & 1 == 1);
        }
        Ok(())
    }

    /// Returns register `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Register`] if `index` is not below [`REGISTER_COUNT`].
    pub const fn try_byte(&self, index: usize) -> Result<u8, RangeError> {
        match Self::check_register(index) {
            Ok(()) => Ok(self.data[index]),
            Err(e) => Err(e),
        }
    }

    /// Overwrites register `index` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Register`] if `index` is not below [`REGISTER_COUNT`].
    pub fn try_set_byte(&mut self, index: usize, value: u8) -> Result<(), RangeError> {
        Self::check_register(index)?;
        self.data[index] = value;
        Ok(())
    }

    /// Returns the bit at `index`, halting on an out-of-range index.
    #[track_caller]
    pub fn bit(&self, index: usize) -> bool {
        match self.try_bit(index) {
            Ok(b) => b,
            Err(e) => fail_fast("BitVector::bit", e),
        }
    }

    /// Stores `value` at `index`, halting on an out-of-range index.
    #[track_caller]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        if let Err(e) = self.try_set_bit(index, value) {
            fail_fast("BitVector::set_bit", e);
        }
    }

    /// Unpacks a field, halting on a malformed range.
    #[track_caller]
    pub fn range(&self, start: usize, count: usize, order: BitOrder) -> u16 {
        match self.try_range(start, count, order) {
            Ok(v) => v,
            Err(e) => fail_fast("BitVector::range", e),
        }
    }

    /// Packs a field, halting on a malformed range.
    #[track_caller]
    pub fn set_range(&mut self, start: usize, count: usize, value: u16, order: BitOrder) {
        if let Err(e) = self.try_set_range(start, count, value, order) {
            fail_fast("BitVector::set_range", e);
        }
    }

    /// Returns register `index`, halting on an out-of-range index.
    #[track_caller]
    pub fn byte(&self, index: usize) -> u8 {
        match self.try_byte(index) {
            Ok(b) => b,
            Err(e) => fail_fast("BitVector::byte", e),
        }
    }

    /// Overwrites register `index`, halting on an out-of-range index.
    #[track_caller]
    pub fn set_byte(&mut self, index: usize, value: u8) {
        if let Err(e) = self.try_set_byte(index, value) {
            fail_fast("BitVector::set_byte", e);
        }
    }

    /// Renders every register as a grid, one row per register.
    pub const fn grid(&self) -> RegisterGrid<'_> {
        RegisterGrid::new(self, 0, REGISTER_COUNT - 1)
    }

    /// Renders registers `first..=last` as a grid, halting if the span is invalid.
    #[track_caller]
    pub fn grid_span(&self, first: usize, last: usize) -> RegisterGrid<'_> {
        if let Err(e) = Self::check_register(last) {
            fail_fast("BitVector::grid_span", e);
        }
        if first > last {
            fail_fast(
                "BitVector::grid_span",
                format_args!("first register {first} after last register {last}"),
            );
        }
        RegisterGrid::new(self, first, last)
    }

    /// Renders the whole vector as a raw bitstring, bit 79 first.
    pub const fn raw(&self) -> RawBits<'_> {
        RawBits::new(self)
    }

    /// Renders one field as a bitstring, halting if it runs past the vector.
    #[track_caller]
    pub fn field_bits(&self, start: usize, count: usize, order: BitOrder) -> FieldBits<'_> {
        if start > CAPACITY || count > CAPACITY - start {
            fail_fast(
                "BitVector::field_bits",
                RangeError::Field {
                    start,
                    count,
                    capacity: CAPACITY,
                },
            );
        }
        FieldBits::new(self, start, count, order)
    }
}

impl From<[u8; REGISTER_COUNT]> for BitVector {
    fn from(bytes: [u8; REGISTER_COUNT]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8; REGISTER_COUNT]> for BitVector {
    fn from(bytes: &[u8; REGISTER_COUNT]) -> Self {
        Self::from_bytes(*bytes)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw(), f)
    }
}
