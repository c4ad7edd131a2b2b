//! (7,4) block code for ancillary data protection.
//!
//! Every 4-bit value expands to a 7-bit codeword with minimum Hamming
//! distance 3, so any single flipped bit is correctable. The code is perfect:
//! the 16 codewords and their distance-1 neighbours cover all 128 possible
//! words, so decoding never fails.

/// The 16 canonical codewords, indexed by 4-bit value. These values define
/// the code on the wire and must match bit-for-bit.
pub const BLOCK_CODE: [u8; 16] = [
    0x00, 0x07, 0x19, 0x1E, 0x2A, 0x2D, 0x33, 0x34, 0x4B, 0x4C, 0x52, 0x55, 0x61, 0x66, 0x78, 0x7F,
];

const fn decode_table() -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut word = 0;
    while word < table.len() {
        let mut value = 0;
        while value < BLOCK_CODE.len() {
            if (BLOCK_CODE[value] ^ word as u8).count_ones() <= 1 {
                table[word] = value as u8;
                break;
            }
            value += 1;
        }
        word += 1;
    }

    table
}

const DECODE: [u8; 128] = decode_table();

/// Expands the low 4 bits of `value` to its 7-bit codeword.
#[inline(always)]
pub const fn encode_nibble(value: u8) -> u8 {
    BLOCK_CODE[(value & 0x0F) as usize]
}

/// Recovers the 4-bit value from a received 7-bit word, correcting at most
/// one flipped bit.
#[inline(always)]
pub const fn decode_word(word: u8) -> u8 {
    DECODE[(word & 0x7F) as usize]
}
