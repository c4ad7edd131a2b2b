//! Control message generation.
//!
//! ADR carries station metadata as a rotating cycle of three short control
//! messages, transmitted one byte per audio frame position. Each message is
//! framed as `STX, type, payload…, EOT, checksum-lo, checksum-hi, ETX` where
//! the checksum digits are uppercase ASCII hex over the wrapping sum of the
//! low 7 bits of every byte from STX through EOT.

use crate::structs::identity::StationIdentity;
use crate::utils::errors::ConfigError;

pub const STX: u8 = 0x02;
pub const ETX: u8 = 0x03;
/// End-of-message byte, included in the checksum.
pub const EOT: u8 = 0x04;

/// Fixed capacity of the message wire buffer. The largest message (SYN with
/// a full 32-byte identity) occupies 39 bytes.
pub const MESSAGE_CAPACITY: usize = 40;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Message checksum: wrapping sum of the low 7 bits of each byte.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b & 0x7F))
}

/// Checksum encoded as two ASCII hex digits, low nibble first.
pub fn checksum_digits(check: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(check & 0x0F) as usize],
        HEX_DIGITS[(check >> 4) as usize],
    ]
}

/// The three control message types, by type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// DC1: service type announcement (free-to-air).
    ServiceType,
    /// DC4: program information (country, coverage, reference, mode,
    /// category).
    ProgramInfo,
    /// SYN: station identity.
    StationId,
}

impl MessageKind {
    pub fn type_byte(self) -> u8 {
        match self {
            MessageKind::ServiceType => 0x11,
            MessageKind::ProgramInfo => 0x14,
            MessageKind::StationId => 0x16,
        }
    }

    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0x11 => Some(MessageKind::ServiceType),
            0x14 => Some(MessageKind::ProgramInfo),
            0x16 => Some(MessageKind::StationId),
            _ => None,
        }
    }

    fn next(self) -> Self {
        match self {
            MessageKind::ServiceType => MessageKind::ProgramInfo,
            MessageKind::ProgramInfo => MessageKind::StationId,
            MessageKind::StationId => MessageKind::ServiceType,
        }
    }
}

/// Channel layout of the underlying audio encoder.
///
/// Selects both the encoder channel count and the mode character announced
/// in DC4 program information messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    Mono,
    Dual,
    #[default]
    JointStereo,
    Stereo,
}

impl ChannelMode {
    pub fn channels(self) -> usize {
        match self {
            ChannelMode::Mono => 1,
            _ => 2,
        }
    }

    /// DC4 mode character: M = mono, A = dual channel, S = (joint) stereo.
    pub fn mode_char(self) -> u8 {
        match self {
            ChannelMode::Mono => b'M',
            ChannelMode::Dual => b'A',
            ChannelMode::JointStereo | ChannelMode::Stereo => b'S',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelMode::Mono => "Mono",
            ChannelMode::Dual => "Dual",
            ChannelMode::JointStereo => "Joint Stereo",
            ChannelMode::Stereo => "Stereo",
        }
    }
}

/// Generates the rotating control message cycle byte-by-byte.
///
/// [`next_byte`](Self::next_byte) is called exactly three times per audio
/// frame, once for each of the three ancillary control byte positions. A new
/// message is generated whenever the current one has been fully consumed,
/// advancing the rotation DC1 → DC4 → SYN → DC1 …
#[derive(Debug)]
pub struct ControlMessageCycle {
    buf: Vec<u8>,
    cursor: usize,
    next_kind: MessageKind,
    mode_char: u8,
    identity: StationIdentity,
}

impl ControlMessageCycle {
    pub fn new(identity: StationIdentity, mode: ChannelMode) -> Result<Self, ConfigError> {
        // SYN is the largest template: STX, type, identity, '#', EOT,
        // two checksum digits, ETX.
        let syn_len = identity.transmitted().len() + 7;
        if syn_len > MESSAGE_CAPACITY {
            return Err(ConfigError::MessageTooLong {
                len: syn_len,
                cap: MESSAGE_CAPACITY,
            });
        }

        Ok(Self {
            buf: Vec::with_capacity(MESSAGE_CAPACITY),
            cursor: 0,
            next_kind: MessageKind::ServiceType,
            mode_char: mode.mode_char(),
            identity,
        })
    }

    /// Returns the next control byte, generating a new message first when
    /// the current one is exhausted.
    pub fn next_byte(&mut self) -> u8 {
        if self.cursor >= self.buf.len() {
            self.generate_next();
        }

        let byte = self.buf[self.cursor];
        self.cursor += 1;
        byte
    }

    fn generate_next(&mut self) {
        self.buf.clear();
        self.buf.push(STX);
        self.buf.push(self.next_kind.type_byte());

        match self.next_kind {
            MessageKind::ServiceType => {}
            MessageKind::ProgramInfo => {
                // E1 = extended country code, C = country code,
                // 2 = coverage area code, 0A = program reference number,
                // then the mode character and program category 2.
                self.buf.extend_from_slice(b"E1C20A");
                self.buf.push(self.mode_char);
                self.buf.push(b'2');
            }
            MessageKind::StationId => {
                self.buf.extend_from_slice(self.identity.transmitted());
                self.buf.push(b'#');
            }
        }

        self.buf.push(EOT);
        self.next_kind = self.next_kind.next();

        let digits = checksum_digits(checksum(&self.buf));
        self.buf.extend_from_slice(&digits);
        self.buf.push(ETX);
        self.cursor = 0;
    }
}
