//! Asset stream decoding
//!
//! Font and sprite files are flat little-endian records read front to
//! back. `AssetReader` wraps any `embedded_io::Read` and turns short
//! reads into [`AssetError::Truncated`].

use embedded_io::{Read, ReadExactError};
use marquee_hal::StorageError;

/// Errors that abort loading a font or image list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// The asset could not be opened
    Open(StorageError),
    /// The stream ended in the middle of a record
    Truncated,
    /// The underlying reader failed
    Io,
    /// More glyphs than the font table can hold with one free slot
    TooManyGlyphs { count: u16, capacity: u16 },
    /// Two glyphs in one file carry the same code
    DuplicateGlyph(u16),
    /// A record declares a negative or oversized dimension
    InvalidDimensions,
}

impl From<StorageError> for AssetError {
    fn from(e: StorageError) -> Self {
        AssetError::Open(e)
    }
}

impl<E> From<ReadExactError<E>> for AssetError {
    fn from(e: ReadExactError<E>) -> Self {
        match e {
            ReadExactError::UnexpectedEof => AssetError::Truncated,
            ReadExactError::Other(_) => AssetError::Io,
        }
    }
}

/// Little-endian record reader over an asset stream
pub struct AssetReader<R> {
    inner: R,
}

impl<R: Read> AssetReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u16(&mut self) -> Result<u16, AssetError> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_i16(&mut self) -> Result<i16, AssetError> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(i16::from_le_bytes(buf))
    }

    /// Fill `buf` completely
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), AssetError> {
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Fill `buf` with consecutive u16 values
    pub fn read_u16_into(&mut self, buf: &mut [u16]) -> Result<(), AssetError> {
        for slot in buf.iter_mut() {
            *slot = self.read_u16()?;
        }
        Ok(())
    }

    /// Give back the wrapped stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}
