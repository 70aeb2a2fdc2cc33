//! Handshake status decoded from a captured vector.

use std::fmt;

use super::signals::capture;
use crate::bits::BitVector;

/// DUT status lines sampled after each clock pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Handshake {
    /// Request acknowledged.
    pub acknowledge: bool,
    /// Result is on the output bus.
    pub data_ready: bool,
    /// Data valid / overflow.
    pub data_valid: bool,
    /// Adder pipeline occupied.
    pub adder_busy: bool,
    /// Multiplier pipeline occupied.
    pub multiplier_busy: bool,
}

impl Handshake {
    /// Extracts the handshake lines from a captured vector.
    pub fn decode(captured: &BitVector) -> Self {
        Self {
            acknowledge: captured.bit(capture::DACK),
            data_ready: captured.bit(capture::DR),
            data_valid: captured.bit(capture::DOV),
            adder_busy: captured.bit(capture::ABUSY),
            multiplier_busy: captured.bit(capture::MBUSY),
        }
    }

    /// Either arithmetic unit is occupied.
    pub const fn busy(&self) -> bool {
        self.adder_busy || self.multiplier_busy
    }
}

impl fmt::Display for Handshake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DACK={} DR={} DOV={} ABUSY={} MBUSY={}",
            u8::from(self.acknowledge),
            u8::from(self.data_ready),
            u8::from(self.data_valid),
            u8::from(self.adder_busy),
            u8::from(self.multiplier_busy)
        )
    }
}
