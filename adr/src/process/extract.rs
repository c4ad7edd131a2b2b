//! Display-only ancillary data extraction.
//!
//! Recovers the 18 ancillary bytes from a frame and reassembles control
//! messages for operator display (`adrenc info`). This is not a protocol
//! decoder: control bytes are treated as 7-bit since the flag bits share
//! bit 7 of the control byte positions, and no attempt is made to recover
//! glyphs above 0x7F exactly.

use crate::structs::ancillary::{
    ANCILLARY_DATA_LEN, ANCILLARY_OFFSET, ANCILLARY_REGION_LEN, SCF_CRC_LEN, SCF_CRC_OFFSET,
};
use crate::structs::message::{
    ETX, MESSAGE_CAPACITY, MessageKind, STX, checksum, checksum_digits,
};
use crate::utils::blockcode::decode_word;
use crate::utils::errors::ExtractError;

const CODEWORDS: usize = ANCILLARY_DATA_LEN * 2;
const ANCILLARY_BITS: usize = CODEWORDS * 7;

/// Reverses the ancillary interleave of a frame, correcting up to one bit
/// error per 7-bit codeword.
pub fn extract_ancillary(frame: &[u8]) -> Result<[u8; ANCILLARY_DATA_LEN], ExtractError> {
    if frame.len() < ANCILLARY_OFFSET + ANCILLARY_REGION_LEN {
        return Err(ExtractError::FrameTooShort(frame.len()));
    }

    let region = &frame[ANCILLARY_OFFSET..ANCILLARY_OFFSET + ANCILLARY_REGION_LEN];

    let mut codewords = [0u8; CODEWORDS];
    for i in 0..ANCILLARY_BITS {
        let mut byte = i >> 3;
        if byte >= SCF_CRC_OFFSET {
            byte += SCF_CRC_LEN;
        }

        let bit = (region[byte] >> (7 - (i & 7))) & 1;
        codewords[i % CODEWORDS] |= bit << (i / CODEWORDS);
    }

    let mut data = [0u8; ANCILLARY_DATA_LEN];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = decode_word(codewords[i * 2]) | (decode_word(codewords[i * 2 + 1]) << 4);
    }

    Ok(data)
}

/// A control message reassembled from the per-frame byte stream.
#[derive(Debug, Clone)]
pub struct ControlMessage {
    pub kind: Option<MessageKind>,
    pub type_byte: u8,
    /// Bytes between the type byte and the end-of-message byte.
    pub payload: Vec<u8>,
    pub checksum_ok: bool,
}

/// Accumulates control bytes across frames and yields complete messages.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    buf: Vec<u8>,
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one control byte (ancillary byte 15, 16 or 17). Returns a
    /// message when `byte` completes one.
    pub fn push_byte(&mut self, byte: u8) -> Option<ControlMessage> {
        // Flag bits share bit 7 with the control data.
        let byte = byte & 0x7F;

        if byte == STX {
            self.buf.clear();
            self.buf.push(byte);
            return None;
        }

        if self.buf.is_empty() {
            // Mid-message join; wait for the next STX.
            return None;
        }

        if byte != ETX {
            if self.buf.len() < MESSAGE_CAPACITY {
                self.buf.push(byte);
            } else {
                // Runaway message, drop it.
                self.buf.clear();
            }
            return None;
        }

        let message = self.assemble();
        self.buf.clear();
        message
    }

    fn assemble(&self) -> Option<ControlMessage> {
        // Minimum: STX, type, EOT, two checksum digits.
        if self.buf.len() < 5 {
            return None;
        }

        let (body, digits) = self.buf.split_at(self.buf.len() - 2);
        let checksum_ok = digits == checksum_digits(checksum(body));

        Some(ControlMessage {
            kind: MessageKind::from_type_byte(body[1]),
            type_byte: body[1],
            // body = STX, type, payload…, EOT
            payload: body[2..body.len() - 1].to_vec(),
            checksum_ok,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::ancillary::{ADR_FRAME_LEN, AncillaryFlags, AncillaryWriter};
    use crate::structs::identity::StationIdentity;
    use crate::structs::message::ChannelMode;
    use crate::utils::blockcode::BLOCK_CODE;
    use crate::utils::charset::EbuCharset;

    fn writer(station: &str, scf_crc: bool) -> AncillaryWriter {
        let charset = EbuCharset::new();
        let identity = StationIdentity::new(station, &charset).unwrap();
        AncillaryWriter::new(identity, ChannelMode::Mono, scf_crc).unwrap()
    }

    #[test]
    fn test_extract_recovers_inserted_data() {
        let mut w = writer("TEST", true);
        let mut frame = vec![0u8; ADR_FRAME_LEN];

        w.insert(&mut frame).unwrap();
        let data = extract_ancillary(&frame).unwrap();

        assert_eq!(&data[..15], &[0u8; 15]);
        assert_eq!(&data[15..], &[0x02, 0x11, 0x84]);
        assert!(AncillaryFlags::from_data(&data).scf_crc);
    }

    #[test]
    fn test_extract_survives_single_bit_error_per_codeword() {
        let mut w = writer("TEST", false);
        let mut frame = vec![0u8; ADR_FRAME_LEN];
        w.insert(&mut frame).unwrap();

        let expected = extract_ancillary(&frame).unwrap();

        // Corrupt bit plane 2: one bit of every codeword.
        for i in 2 * 36..3 * 36 {
            let mut byte = i >> 3;
            if byte >= SCF_CRC_OFFSET {
                byte += SCF_CRC_LEN;
            }
            frame[ANCILLARY_OFFSET + byte] ^= 1 << (7 - (i & 7));
        }

        assert_eq!(extract_ancillary(&frame).unwrap(), expected);
    }

    #[test]
    fn test_extract_rejects_short_frame() {
        assert!(matches!(
            extract_ancillary(&[0u8; 64]),
            Err(ExtractError::FrameTooShort(64))
        ));
    }

    #[test]
    fn test_assembler_reads_whole_cycle_from_frames() {
        let mut w = writer("TEST", false);
        let mut assembler = MessageAssembler::new();
        let mut frame = vec![0u8; ADR_FRAME_LEN];
        let mut messages = Vec::new();

        for _ in 0..32 {
            w.insert(&mut frame).unwrap();
            let data = extract_ancillary(&frame).unwrap();
            for &byte in &data[15..] {
                if let Some(msg) = assembler.push_byte(byte) {
                    messages.push(msg);
                }
            }
        }

        assert!(messages.len() >= 6);
        assert!(messages.iter().all(|m| m.checksum_ok));

        let kinds: Vec<_> = messages.iter().take(3).map(|m| m.kind.unwrap()).collect();
        assert_eq!(
            kinds,
            [
                MessageKind::ServiceType,
                MessageKind::ProgramInfo,
                MessageKind::StationId,
            ]
        );

        let syn = &messages[2];
        assert_eq!(syn.payload, b"TEST#");

        let dc4 = &messages[1];
        assert_eq!(dc4.payload, b"E1C20AM2");
    }

    #[test]
    fn test_assembler_waits_for_message_start() {
        let mut assembler = MessageAssembler::new();

        // Joining mid-message: bytes before the first STX are ignored.
        assert!(assembler.push_byte(b'7').is_none());
        assert!(assembler.push_byte(ETX).is_none());

        for &byte in &[STX, 0x11, 0x04, b'7', b'1'] {
            assert!(assembler.push_byte(byte).is_none());
        }
        let msg = assembler.push_byte(ETX).expect("complete message");
        assert_eq!(msg.kind, Some(MessageKind::ServiceType));
        assert!(msg.checksum_ok);
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn test_corrupted_checksum_is_flagged() {
        let mut assembler = MessageAssembler::new();

        for &byte in &[STX, 0x11, 0x04, b'8', b'1'] {
            assert!(assembler.push_byte(byte).is_none());
        }
        let msg = assembler.push_byte(ETX).expect("complete message");
        assert!(!msg.checksum_ok);
    }

    #[test]
    fn test_block_code_words_on_wire() {
        // Every 7-bit word recovered from a clean frame must be canonical.
        let mut w = writer("", false);
        let mut frame = vec![0u8; ADR_FRAME_LEN];
        w.insert(&mut frame).unwrap();

        let region = &frame[ANCILLARY_OFFSET..ANCILLARY_OFFSET + ANCILLARY_REGION_LEN];
        let mut codewords = [0u8; CODEWORDS];
        for i in 0..ANCILLARY_BITS {
            let mut byte = i >> 3;
            if byte >= SCF_CRC_OFFSET {
                byte += SCF_CRC_LEN;
            }
            codewords[i % CODEWORDS] |= ((region[byte] >> (7 - (i & 7))) & 1) << (i / CODEWORDS);
        }

        for word in codewords {
            assert!(BLOCK_CODE.contains(&word), "{word:#04X}");
        }
    }
}
