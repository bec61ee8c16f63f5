//! Fixed 4-byte frame format on the keypad link.
//!
//! Layout: code, value low byte, value high byte, CRC-8 of the first three.
//! The pilot-facing link carries arbitrary bytes; only the keypad link is
//! framed, and only two codes carry meaning for the bridge.

use crate::crc::crc8;

/// Every frame is exactly this long.
pub const FRAME_LEN: usize = 4;

/// Keypad -> bridge: discrete button press, value 1..=5.
pub const BUTTON_EVENT_CODE: u8 = 0xE0;

/// Bridge -> keypad: autopilot enabled state, value 0 or 1.
pub const AP_ENABLED_CODE: u8 = 0xE1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub code: u8,
    pub value: u16,
}

impl Frame {
    pub fn new(code: u8, value: u16) -> Self {
        Self { code, value }
    }

    /// Serialize to the wire layout, appending the checksum.
    #[must_use]
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let body = [self.code, (self.value & 0xFF) as u8, (self.value >> 8) as u8];
        [body[0], body[1], body[2], crc8(&body)]
    }

    /// Parse 4 raw bytes. Never fails structurally; the bool reports whether
    /// the trailing checksum matched. Callers that only forward bytes ignore
    /// it, callers that act on frame content must check it.
    #[must_use]
    pub fn decode(raw: &[u8; FRAME_LEN]) -> (Self, bool) {
        let frame = Self {
            code: raw[0],
            value: u16::from(raw[1]) | (u16::from(raw[2]) << 8),
        };
        (frame, crc8(&raw[..3]) == raw[3])
    }
}
