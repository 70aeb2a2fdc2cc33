//! Signal map of the DUT wiring.
//!
//! Offsets are bit positions inside the two chains, not host pins. Each chain is its own
//! address space: the drive chain carries DUT inputs, the capture chain DUT outputs.
//! These values are fixed by the board layout and must match it bit for bit.

/// Drive chain (DUT inputs).
pub mod drive {
    /// First operand, 16 bits.
    pub const DIN1: usize = 0;
    /// Second operand, 16 bits.
    pub const DIN2: usize = 16;
    /// Functional clock.
    pub const CLK: usize = 32;
    /// Active-low DUT reset.
    pub const RST_N: usize = 33;
    /// Chip select; doubles as the operation request line.
    pub const CS: usize = 34;
    /// Internal clock divider select.
    pub const DIV: usize = 35;
    /// Data-out-available strobe: the host has taken the result.
    pub const DOA: usize = 36;
    /// Debug mode selector, 3 bits.
    pub const MODE: usize = 37;
    /// Operation select: 0 add, 1 multiply.
    pub const OPT: usize = 40;

    /// Width of each operand.
    pub const DIN_WIDTH: usize = 16;
    /// Width of the debug mode selector.
    pub const MODE_WIDTH: usize = 3;
}

/// Capture chain (DUT outputs).
pub mod capture {
    /// Result, 16 bits.
    pub const DOUT: usize = 0;
    /// Request acknowledge.
    pub const DACK: usize = 16;
    /// Data ready.
    pub const DR: usize = 17;
    /// Data valid / overflow.
    pub const DOV: usize = 18;
    /// Exception code, 3 bits.
    pub const EXC: usize = 19;
    /// Debug bus, 5 bits.
    pub const DEBUG: usize = 22;
    /// Adder busy.
    pub const ABUSY: usize = 27;
    /// Multiplier busy.
    pub const MBUSY: usize = 28;

    /// Width of the result.
    pub const DOUT_WIDTH: usize = 16;
    /// Width of the exception code.
    pub const EXC_WIDTH: usize = 3;
    /// Width of the debug bus.
    pub const DEBUG_WIDTH: usize = 5;
}
