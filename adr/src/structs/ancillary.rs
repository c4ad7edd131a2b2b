//! Ancillary data layout and insertion.
//!
//! Each ADR frame reserves 36 bytes at a fixed offset for ancillary data.
//! 18 data bytes expand through the (7,4) block code into 36 seven-bit
//! codewords whose 252 bits are interleaved column-wise across the region,
//! skipping a 4-byte gap that holds the externally stamped scale factor CRC.

use crate::structs::identity::StationIdentity;
use crate::structs::message::{ChannelMode, ControlMessageCycle};
use crate::utils::blockcode::encode_nibble;
use crate::utils::errors::{ConfigError, EncodeError};

/// ADR frame length: 48 kHz at 192 kbit/s gives a 576 byte frame.
pub const ADR_FRAME_LEN: usize = 576;

/// Offset of the ancillary region from the start of a frame.
pub const ANCILLARY_OFFSET: usize = 0x21C;

/// Total ancillary region size, including the scale factor CRC gap.
pub const ANCILLARY_REGION_LEN: usize = 36;

/// Number of raw ancillary data bytes per frame.
pub const ANCILLARY_DATA_LEN: usize = 18;

/// Region byte index where the 4-byte scale factor CRC field begins.
/// Interleaved bits skip over this gap.
pub const SCF_CRC_OFFSET: usize = 30;
pub const SCF_CRC_LEN: usize = 4;

const CODEWORDS: usize = ANCILLARY_DATA_LEN * 2;
const ANCILLARY_BITS: usize = CODEWORDS * 7;

/// Flag bits carried in bit 7 of ancillary bytes 15, 16 and 17.
///
/// Only `scf_crc` is ever set by this encoder; the other two positions are
/// defined by the format and stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AncillaryFlags {
    /// Start of key period for pay-service smart card decryption.
    pub key_period_start: bool,
    /// RDS and auxiliary data are complemented in this frame.
    pub rds_complement: bool,
    /// A scale factor CRC is present.
    pub scf_crc: bool,
}

impl AncillaryFlags {
    pub fn from_data(data: &[u8; ANCILLARY_DATA_LEN]) -> Self {
        Self {
            key_period_start: data[15] & 0x80 != 0,
            rds_complement: data[16] & 0x80 != 0,
            scf_crc: data[17] & 0x80 != 0,
        }
    }
}

/// Builds and inserts the ancillary region of each frame.
///
/// Owns the control message cycle; every [`insert`](Self::insert) call
/// consumes exactly three message bytes, so frames must be presented in
/// transmission order.
#[derive(Debug)]
pub struct AncillaryWriter {
    cycle: ControlMessageCycle,
    flags: AncillaryFlags,
}

impl AncillaryWriter {
    pub fn new(
        identity: StationIdentity,
        mode: ChannelMode,
        scf_crc: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            cycle: ControlMessageCycle::new(identity, mode)?,
            flags: AncillaryFlags {
                key_period_start: false,
                rds_complement: false,
                scf_crc,
            },
        })
    }

    /// Writes the next frame's ancillary data into `frame` in place,
    /// leaving the scale factor CRC gap untouched.
    pub fn insert(&mut self, frame: &mut [u8]) -> Result<(), EncodeError> {
        if frame.len() < ANCILLARY_OFFSET + ANCILLARY_REGION_LEN {
            return Err(EncodeError::FrameTooShort {
                len: frame.len(),
                expected: ANCILLARY_OFFSET + ANCILLARY_REGION_LEN,
            });
        }

        let mut data = [0u8; ANCILLARY_DATA_LEN];
        for slot in &mut data[15..] {
            *slot = self.cycle.next_byte();
        }

        data[15] |= (self.flags.key_period_start as u8) << 7;
        data[16] |= (self.flags.rds_complement as u8) << 7;
        data[17] |= (self.flags.scf_crc as u8) << 7;

        // Two codewords per data byte, low nibble first
        let mut codewords = [0u8; CODEWORDS];
        for (i, &byte) in data.iter().enumerate() {
            codewords[i * 2] = encode_nibble(byte & 0x0F);
            codewords[i * 2 + 1] = encode_nibble(byte >> 4);
        }

        let region = &mut frame[ANCILLARY_OFFSET..ANCILLARY_OFFSET + ANCILLARY_REGION_LEN];
        for (i, byte) in region.iter_mut().enumerate() {
            if !(SCF_CRC_OFFSET..SCF_CRC_OFFSET + SCF_CRC_LEN).contains(&i) {
                *byte = 0;
            }
        }

        // Column-wise interleave: all codewords contribute bit 0 first,
        // then bit 1, across 7 planes of 36 bits. MSB first within each
        // region byte.
        for i in 0..ANCILLARY_BITS {
            let mut byte = i >> 3;
            if byte >= SCF_CRC_OFFSET {
                byte += SCF_CRC_LEN;
            }

            let bit = (codewords[i % CODEWORDS] >> (i / CODEWORDS)) & 1;
            region[byte] |= bit << (7 - (i & 7));
        }

        Ok(())
    }
}
