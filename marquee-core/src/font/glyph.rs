//! Bitmap glyphs
//!
//! A glyph is stored column by column: one `u16` per column, bit `y`
//! set when row `y` is lit. Glyphs are therefore at most 16 rows tall.

use alloc::boxed::Box;
use alloc::vec;
use embedded_io::Read;

use crate::asset::{AssetError, AssetReader};

/// Rows a column bitmap can address
pub const MAX_GLYPH_HEIGHT: i16 = 16;

/// Widest glyph accepted from an asset file
pub const MAX_GLYPH_WIDTH: i16 = 256;

/// One character bitmap with its metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    code: u16,
    width: i16,
    height: i16,
    offset: i16,
    advance: i16,
    columns: Box<[u16]>,
}

impl Glyph {
    /// Build a glyph from its metrics and column bitmaps
    ///
    /// `width` is taken from `columns.len()`.
    pub fn new(code: u16, height: i16, offset: i16, advance: i16, columns: &[u16]) -> Self {
        Self {
            code,
            width: columns.len() as i16,
            height,
            offset,
            advance,
            columns: columns.into(),
        }
    }

    /// Read one glyph record: code, width, offset, advance, then
    /// `width` column bitmaps when width is positive
    pub fn read_from<R: Read>(reader: &mut AssetReader<R>, height: i16) -> Result<Self, AssetError> {
        let code = reader.read_u16()?;
        let width = reader.read_i16()?;
        let offset = reader.read_i16()?;
        let advance = reader.read_i16()?;

        if width > MAX_GLYPH_WIDTH {
            return Err(AssetError::InvalidDimensions);
        }

        let columns = if width > 0 {
            let mut columns = vec![0u16; width as usize].into_boxed_slice();
            reader.read_u16_into(&mut columns)?;
            columns
        } else {
            Box::default()
        };

        Ok(Self {
            code,
            width: width.max(0),
            height,
            offset,
            advance,
            columns,
        })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    /// Font-wide row count
    pub fn height(&self) -> i16 {
        self.height
    }

    /// Horizontal bearing applied before drawing
    pub fn offset(&self) -> i16 {
        self.offset
    }

    /// Cursor movement after drawing
    pub fn advance(&self) -> i16 {
        self.advance
    }

    /// Column bitmaps, left to right
    pub fn columns(&self) -> &[u16] {
        &self.columns
    }

    /// Check whether the pixel at `(x, y)` is lit
    pub fn is_set(&self, x: i16, y: i16) -> bool {
        if x < 0 || y < 0 || y >= self.height.min(MAX_GLYPH_HEIGHT) {
            return false;
        }
        self.columns
            .get(x as usize)
            .is_some_and(|&col| col & (1 << y) != 0)
    }

    /// Pixel level at `(x, y)`: full white when lit, 0 otherwise
    pub fn pixel(&self, x: i16, y: i16) -> u8 {
        if self.is_set(x, y) {
            0x0F
        } else {
            0x00
        }
    }
}
