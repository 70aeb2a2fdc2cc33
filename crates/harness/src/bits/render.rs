//! Diagnostic renderings of a [`BitVector`].
//!
//! None of these views take part in a test verdict; they exist so a bench operator can
//! read the last driven or captured vector off the console.

use std::fmt;

use super::BitOrder;
use super::vector::{BitVector, CAPACITY, REGISTER_WIDTH};

/// One row per register, most significant bit on the left.
///
/// ```text
///    7 6 5 4 3 2 1 0
/// 0  0 0 0 0 0 0 1 1
/// 1  0 0 0 0 0 0 0 0
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RegisterGrid<'a> {
    vector: &'a BitVector,
    first: usize,
    last: usize,
}

impl<'a> RegisterGrid<'a> {
    pub(super) const fn new(vector: &'a BitVector, first: usize, last: usize) -> Self {
        Self {
            vector,
            first,
            last,
        }
    }
}

impl fmt::Display for RegisterGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   7 6 5 4 3 2 1 0")?;
        for reg in self.first..=self.last {
            write!(f, "{reg:X}  ")?;
            let byte = self.vector.byte(reg);
            for bit in (0..REGISTER_WIDTH).rev() {
                write!(f, "{} ", (byte >> bit) & 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The whole vector as a bitstring, bit 79 first, a space after every register.
#[derive(Clone, Copy, Debug)]
pub struct RawBits<'a> {
    vector: &'a BitVector,
}

impl<'a> RawBits<'a> {
    pub(super) const fn new(vector: &'a BitVector) -> Self {
        Self { vector }
    }
}

impl fmt::Display for RawBits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in (0..CAPACITY).rev() {
            write!(f, "{}", u8::from(self.vector.bit(index)))?;
            if index % REGISTER_WIDTH == 0 && index != 0 {
                write!(f, " ")?;
            }
        }
        Ok(())
    }
}

/// A single field as a bitstring.
///
/// Forward fields print most significant bit first. Reversed fields print in index
/// order, which again puts the field's most significant bit first.
#[derive(Clone, Copy, Debug)]
pub struct FieldBits<'a> {
    vector: &'a BitVector,
    start: usize,
    count: usize,
    order: BitOrder,
}

impl<'a> FieldBits<'a> {
    pub(super) const fn new(vector: &'a BitVector, start: usize, count: usize, order: BitOrder) -> Self {
        Self {
            vector,
            start,
            count,
            order,
        }
    }
}

impl fmt::Display for FieldBits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices = self.start..self.start + self.count;
        if self.order.is_reversed() {
            for index in indices {
                write!(f, "{}", u8::from(self.vector.bit(index)))?;
            }
        } else {
            for index in indices.rev() {
                write!(f, "{}", u8::from(self.vector.bit(index)))?;
            }
        }
        Ok(())
    }
}
