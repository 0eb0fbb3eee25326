//! Multi-byte text to display codes
//!
//! Text arrives as UTF-8 bytes (tag data, file names). Fonts are indexed
//! by 16-bit codes, so only 1-, 2- and 3-byte sequences map to glyphs;
//! everything else decodes to [`NO_GLYPH`] and consumes a single byte.

/// Code returned for bytes that have no display code
pub const NO_GLYPH: u16 = 0x0000;

/// Decode the display code at the start of `text`
///
/// Returns the code and the number of bytes consumed. An empty slice
/// yields `(NO_GLYPH, 0)`.
pub fn decode_char(text: &[u8]) -> (u16, usize) {
    let Some(&lead) = text.first() else {
        return (NO_GLYPH, 0);
    };

    if lead & 0xF0 == 0xE0 {
        if let &[_, b1, b2, ..] = text {
            let code = ((lead as u16 & 0x0F) << 12) | ((b1 as u16 & 0x3F) << 6) | (b2 as u16 & 0x3F);
            return (code, 3);
        }
        return (NO_GLYPH, 1);
    }

    if lead & 0xE0 == 0xC0 {
        if let &[_, b1, ..] = text {
            let code = ((lead as u16 & 0x1F) << 6) | (b1 as u16 & 0x3F);
            return (code, 2);
        }
        return (NO_GLYPH, 1);
    }

    if (0x20..=0x7E).contains(&lead) {
        return (lead as u16, 1);
    }

    (NO_GLYPH, 1)
}

/// Iterator over the display codes of a byte string
///
/// Iteration stops at the end of the slice or at a NUL byte, so
/// fixed-size NUL-padded buffers can be passed as is.
#[derive(Debug, Clone)]
pub struct Codes<'a> {
    rest: &'a [u8],
}

/// Iterate the display codes of `text`
pub fn codes(text: &[u8]) -> Codes<'_> {
    Codes { rest: text }
}

impl Iterator for Codes<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.rest.first().map_or(true, |&b| b == 0) {
            return None;
        }
        let (code, used) = decode_char(self.rest);
        self.rest = &self.rest[used..];
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(decode_char(b"A"), (0x41, 1));
        assert_eq!(decode_char(b" x"), (0x20, 1));
        assert_eq!(decode_char(b"~"), (0x7E, 1));
    }

    #[test]
    fn test_control_bytes_have_no_glyph() {
        assert_eq!(decode_char(b"\n"), (NO_GLYPH, 1));
        assert_eq!(decode_char(&[0x7F]), (NO_GLYPH, 1));
    }

    #[test]
    fn test_two_byte_sequence() {
        // U+00E9 LATIN SMALL LETTER E WITH ACUTE
        assert_eq!(decode_char("é".as_bytes()), (0x00E9, 2));
    }

    #[test]
    fn test_three_byte_sequence() {
        // U+3042 HIRAGANA LETTER A
        assert_eq!(decode_char("あ".as_bytes()), (0x3042, 3));
    }

    #[test]
    fn test_four_byte_sequence_degrades_per_byte() {
        let bytes = "😀".as_bytes();
        let all: heapless::Vec<u16, 8> = codes(bytes).collect();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|&c| c == NO_GLYPH));
    }

    #[test]
    fn test_truncated_sequence() {
        assert_eq!(decode_char(&[0xE3, 0x81]), (NO_GLYPH, 1));
        assert_eq!(decode_char(&[0xC3]), (NO_GLYPH, 1));
    }

    #[test]
    fn test_codes_stop_at_nul() {
        let all: heapless::Vec<u16, 8> = codes(b"Hi\0junk").collect();
        assert_eq!(all.as_slice(), &[0x48, 0x69]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(decode_char(b""), (NO_GLYPH, 0));
        assert_eq!(codes(b"").count(), 0);
    }

    proptest! {
        #[test]
        fn prop_decode_always_progresses(bytes in proptest::collection::vec(any::<u8>(), 1..32)) {
            let (_, used) = decode_char(&bytes);
            prop_assert!((1..=3).contains(&used));
            prop_assert!(used <= bytes.len());
        }

        #[test]
        fn prop_bmp_text_decodes_to_code_points(text in "[ -~\u{a0}-\u{7ff}\u{3040}-\u{30ff}]{0,16}") {
            let decoded: std::vec::Vec<u16> = codes(text.as_bytes()).collect();
            let expected: std::vec::Vec<u16> = text.chars().map(|c| c as u16).collect();
            prop_assert_eq!(decoded, expected);
        }
    }
}
