//! Bitmap fonts
//!
//! A [`Font`] owns its glyphs in one arena and indexes them through a
//! fixed-capacity open-addressing table: the home slot of a code is
//! `code % capacity` and collisions probe linearly, wrapping at the end.
//! Insertion and lookup walk the same probe sequence, and the table is
//! always kept at least one slot larger than the glyph count so every
//! lookup meets an empty slot or its glyph within `capacity` steps.
//!
//! # File format
//!
//! ```text
//! u16 glyph_count
//! repeated glyph_count times:
//!     u16 code, i16 width, i16 offset, i16 advance,
//!     width x u16 column bitmaps (only when width > 0)
//! ```
//!
//! All values are little-endian. The font height is not stored in the
//! file; it is supplied by the caller when loading.

mod decode;
mod glyph;

pub use decode::{codes, decode_char, Codes, NO_GLYPH};
pub use glyph::{Glyph, MAX_GLYPH_HEIGHT, MAX_GLYPH_WIDTH};

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use embedded_io::Read;
use marquee_hal::AssetStorage;

use crate::asset::{AssetError, AssetReader};

/// Table size used by the panel fonts
pub const DEFAULT_CAPACITY: u16 = 1023;

/// Glyph table with hashed code lookup
pub struct Font {
    height: i16,
    glyphs: Vec<Glyph>,
    /// Probe table: index into `glyphs`, `None` for a free slot
    table: Box<[Option<u16>]>,
}

impl Font {
    /// Create an empty font with the default table size
    pub fn new(height: i16) -> Self {
        Self::with_capacity(height, DEFAULT_CAPACITY)
    }

    /// Create an empty font with `capacity` table slots
    ///
    /// At most `capacity - 1` glyphs fit.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(height: i16, capacity: u16) -> Self {
        assert!(capacity > 0, "font table needs at least one slot");
        Self {
            height,
            glyphs: Vec::new(),
            table: vec![None; capacity as usize].into_boxed_slice(),
        }
    }

    /// Load a font file from asset storage
    pub fn load<S: AssetStorage>(storage: &mut S, path: &str, height: i16) -> Result<Self, AssetError> {
        let file = match storage.open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Cannot open font {}", path);
                return Err(e.into());
            }
        };
        let font = Self::read_from(file, height)?;
        info!("{} loaded ({} glyphs)", path, font.len());
        Ok(font)
    }

    /// Read a font from a stream using the default table size
    pub fn read_from<R: Read>(reader: R, height: i16) -> Result<Self, AssetError> {
        Self::read_with_capacity(reader, height, DEFAULT_CAPACITY)
    }

    /// Read a font from a stream into a table of `capacity` slots
    pub fn read_with_capacity<R: Read>(reader: R, height: i16, capacity: u16) -> Result<Self, AssetError> {
        if !(0..=MAX_GLYPH_HEIGHT).contains(&height) {
            return Err(AssetError::InvalidDimensions);
        }

        let mut reader = AssetReader::new(reader);
        let count = reader.read_u16()?;
        if count >= capacity {
            return Err(AssetError::TooManyGlyphs { count, capacity });
        }

        let mut font = Self::with_capacity(height, capacity);
        font.glyphs.reserve_exact(count as usize);
        for _ in 0..count {
            let glyph = Glyph::read_from(&mut reader, height)?;
            font.insert(glyph)?;
        }
        Ok(font)
    }

    /// Add a glyph to the table
    ///
    /// Fails when the table would lose its last free slot or when the
    /// code is already present.
    pub fn insert(&mut self, glyph: Glyph) -> Result<(), AssetError> {
        let capacity = self.capacity();
        if self.glyphs.len() + 1 >= capacity as usize {
            return Err(AssetError::TooManyGlyphs {
                count: self.glyphs.len() as u16 + 1,
                capacity,
            });
        }

        let code = glyph.code();
        let mut index = self.home_slot(code);
        while let Some(existing) = self.table[index] {
            if self.glyphs[existing as usize].code() == code {
                return Err(AssetError::DuplicateGlyph(code));
            }
            index = (index + 1) % self.table.len();
        }

        self.table[index] = Some(self.glyphs.len() as u16);
        self.glyphs.push(glyph);
        Ok(())
    }

    /// Look up the glyph for `code`
    pub fn glyph(&self, code: u16) -> Option<&Glyph> {
        let mut index = self.home_slot(code);
        for _ in 0..self.table.len() {
            let slot = self.table[index]?;
            let glyph = &self.glyphs[slot as usize];
            if glyph.code() == code {
                return Some(glyph);
            }
            index = (index + 1) % self.table.len();
        }
        None
    }

    /// Pixel width of `text` drawn with this font
    ///
    /// Codes without a glyph contribute nothing.
    pub fn text_width(&self, text: &[u8]) -> i16 {
        codes(text)
            .filter_map(|code| self.glyph(code))
            .fold(0i16, |w, g| w.saturating_add(g.advance()))
    }

    /// Pixel width of a byte-per-code string
    pub fn ascii_width(&self, text: &[u8]) -> i16 {
        text.iter()
            .take_while(|&&b| b != 0)
            .filter_map(|&b| self.glyph(b as u16))
            .fold(0i16, |w, g| w.saturating_add(g.advance()))
    }

    /// Shared row count of every glyph
    pub fn height(&self) -> i16 {
        self.height
    }

    /// Number of probe table slots
    pub fn capacity(&self) -> u16 {
        self.table.len() as u16
    }

    /// Number of loaded glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All glyphs in load order
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    fn home_slot(&self, code: u16) -> usize {
        code as usize % self.table.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    /// Serialize glyphs into the on-disk font layout
    pub(crate) fn font_file(glyphs: &[(u16, i16, i16, &[u16])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(glyphs.len() as u16).to_le_bytes());
        for &(code, offset, advance, columns) in glyphs {
            out.extend_from_slice(&code.to_le_bytes());
            out.extend_from_slice(&(columns.len() as i16).to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&advance.to_le_bytes());
            for c in columns {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out
    }

    #[test]
    fn test_load_and_lookup() {
        let data = font_file(&[(0x41, 0, 6, &[0xFF; 5]), (0x42, 0, 6, &[0x0F; 5])]);
        let font = Font::read_from(data.as_slice(), 8).unwrap();
        assert_eq!(font.len(), 2);
        assert_eq!(font.glyph(0x41).unwrap().advance(), 6);
        assert_eq!(font.glyph(0x42).unwrap().columns()[0], 0x0F);
        assert!(font.glyph(0x43).is_none());
    }

    #[test]
    fn test_colliding_codes_probe_linearly() {
        let mut font = Font::with_capacity(16, 7);
        // 3, 10 and 17 share home slot 3
        for code in [3u16, 10, 17] {
            font.insert(Glyph::new(code, 16, 0, code as i16, &[])).unwrap();
        }
        assert_eq!(font.glyph(10).unwrap().advance(), 10);
        assert_eq!(font.glyph(17).unwrap().advance(), 17);
        assert!(font.glyph(24).is_none());
    }

    #[test]
    fn test_probe_wraps_around_table_end() {
        let mut font = Font::with_capacity(16, 5);
        font.insert(Glyph::new(4, 16, 0, 1, &[])).unwrap();
        font.insert(Glyph::new(9, 16, 0, 2, &[])).unwrap();
        assert_eq!(font.glyph(9).unwrap().advance(), 2);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let data = font_file(&[(0x41, 0, 6, &[1]), (0x41, 0, 7, &[1])]);
        assert_eq!(
            Font::read_from(data.as_slice(), 8).err(),
            Some(AssetError::DuplicateGlyph(0x41))
        );
    }

    #[test]
    fn test_capacity_must_exceed_count() {
        let data = font_file(&[(1, 0, 1, &[]), (2, 0, 1, &[]), (3, 0, 1, &[])]);
        assert_eq!(
            Font::read_with_capacity(data.as_slice(), 8, 3).err(),
            Some(AssetError::TooManyGlyphs { count: 3, capacity: 3 })
        );
        assert!(Font::read_with_capacity(data.as_slice(), 8, 4).is_ok());
    }

    #[test]
    fn test_truncated_file() {
        let mut data = font_file(&[(0x41, 0, 6, &[0xFF; 5])]);
        data.truncate(data.len() - 1);
        assert_eq!(
            Font::read_from(data.as_slice(), 8).err(),
            Some(AssetError::Truncated)
        );
    }

    #[test]
    fn test_text_width_skips_missing() {
        let data = font_file(&[(b'H' as u16, 0, 7, &[1]), (b'I' as u16, 0, 3, &[1])]);
        let font = Font::read_from(data.as_slice(), 8).unwrap();
        assert_eq!(font.text_width(b"HI?H"), 17);
        assert_eq!(font.ascii_width(b"HI\0H"), 10);
    }

    proptest! {
        #[test]
        fn prop_inserted_codes_are_found(
            codes in proptest::collection::hash_set(any::<u16>(), 0..60),
            absent in any::<u16>(),
            capacity in 61u16..128,
        ) {
            let mut font = Font::with_capacity(16, capacity);
            for &code in &codes {
                font.insert(Glyph::new(code, 16, 0, 1, &[])).unwrap();
            }
            for &code in &codes {
                prop_assert_eq!(font.glyph(code).map(|g| g.code()), Some(code));
            }
            if !codes.contains(&absent) {
                prop_assert!(font.glyph(absent).is_none());
            }
        }
    }
}
