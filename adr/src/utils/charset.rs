//! EBU Latin broadcast character set.
//!
//! ADR station and program text is carried as single-byte codes from the
//! 256-entry EBU Latin repertoire rather than raw UTF-8. The table below maps
//! each code to its Unicode glyph; `'\0'` marks unassigned slots. A reverse
//! map is built once at construction so encoding does not rescan the table
//! for every character.

use std::collections::HashMap;

/// Glyph assigned to each EBU Latin code. `'\0'` = unassigned.
pub const GLYPHS: [char; 256] = [
    '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
    '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '@', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '[', '\\', ']', '―', '_',
    '‖', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '{', '|', '}', '¯', '\0',
    'á', 'à', 'é', 'è', 'í', 'ì', 'ó', 'ò', 'ú', 'ù', 'Ñ', 'Ç', 'Ş', 'β', '¡', 'Ĳ',
    'â', 'ä', 'ê', 'ë', 'î', 'ï', 'ô', 'ö', 'û', 'ü', 'ñ', 'ç', 'ş', 'ǧ', 'ı', 'ĳ',
    'ª', 'α', '©', '‰', 'Ǧ', 'ě', 'ň', 'ő', 'π', '€', '£', '$', '←', '↑', '→', '↓',
    'º', '¹', '²', '³', '±', 'İ', 'ń', 'ű', 'µ', '¿', '÷', '°', '¼', '½', '¾', '§',
    'Á', 'À', 'É', 'È', 'Í', 'Ì', 'Ó', 'Ò', 'Ú', 'Ù', 'Ř', 'Č', 'Š', 'Ž', 'Ð', 'Ŀ',
    'Â', 'Ä', 'Ê', 'Ë', 'Î', 'Ï', 'Ô', 'Ö', 'Û', 'Ü', 'ř', 'č', 'š', 'ž', 'đ', 'ŀ',
    'Ã', 'Å', 'Æ', 'Œ', 'ŷ', 'Ý', 'Õ', 'Ø', 'Þ', 'Ŋ', 'Ŕ', 'Ć', 'Ś', 'Ź', 'Ŧ', 'ð',
    'ã', 'å', 'æ', 'œ', 'ŵ', 'ý', 'õ', 'ø', 'þ', 'ŋ', 'ŕ', 'ć', 'ś', 'ź', 'ŧ', '\0',
];

/// EBU Latin code for the space character, substituted for any code point
/// the character set cannot represent.
pub const CODE_SPACE: u8 = 0x20;

/// Bidirectional codec between Unicode text and EBU Latin codes.
#[derive(Debug)]
pub struct EbuCharset {
    reverse: HashMap<char, u8>,
}

impl Default for EbuCharset {
    fn default() -> Self {
        Self::new()
    }
}

impl EbuCharset {
    pub fn new() -> Self {
        let mut reverse = HashMap::with_capacity(GLYPHS.len());
        for (code, &glyph) in GLYPHS.iter().enumerate() {
            if glyph != '\0' {
                // Lowest code wins should a glyph ever repeat
                reverse.entry(glyph).or_insert(code as u8);
            }
        }

        Self { reverse }
    }

    /// Returns the code for `glyph`, or [`CODE_SPACE`] when the character
    /// set has no assignment for it. Unicode replacement characters from
    /// lossy UTF-8 conversion fall through to a space like any other
    /// unmapped code point.
    pub fn code_for(&self, glyph: char) -> u8 {
        self.reverse.get(&glyph).copied().unwrap_or(CODE_SPACE)
    }

    /// Encodes `text` into `dst` one code point at a time, truncating at
    /// `dst.len()` code points and zero-filling the remainder.
    pub fn encode_to(&self, text: &str, dst: &mut [u8]) {
        let mut chars = text.chars();

        for slot in dst.iter_mut() {
            *slot = match chars.next() {
                Some(c) => self.code_for(c),
                None => 0,
            };
        }
    }

    /// Decodes EBU Latin codes back into text, stopping at the first zero
    /// byte. Unassigned codes render as `'?'`.
    ///
    /// For operator display only; round-tripping is not wire-exact for
    /// unmapped input characters.
    pub fn decode(&self, codes: &[u8]) -> String {
        codes
            .iter()
            .take_while(|&&code| code != 0)
            .map(|&code| match GLYPHS[code as usize] {
                '\0' => '?',
                glyph => glyph,
            })
            .collect()
    }
}
