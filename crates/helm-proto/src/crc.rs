//! CRC-8 checksum for keypad frames.
//!
//! The keypad firmware computes CRC-8 MSB-first with polynomial 0x31 and
//! initial value 0xFF (no reflection, no final xor). That is exactly
//! CRC-8/NRSC-5, so both ends of the link agree bit-for-bit.

use crc::{Crc, CRC_8_NRSC_5};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// Checksum of a frame body (code + value bytes).
#[inline]
#[must_use]
pub fn crc8(body: &[u8]) -> u8 {
    CRC8.checksum(body)
}
