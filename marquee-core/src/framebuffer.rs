//! Packed 4-bit framebuffer
//!
//! Each byte holds two horizontally adjacent pixels: the even x in the
//! high nibble, the odd x in the low nibble. This is the same layout the
//! SSD1322 expects on its data bus, so rows stream to the panel without
//! conversion.

use alloc::boxed::Box;
use alloc::vec;

/// Bits per pixel
pub const DEPTH: usize = 4;

/// Brightest grayscale level
pub const WHITE: u8 = 0x0F;

/// Darkest grayscale level
pub const BLACK: u8 = 0x00;

/// Row stride in bytes for a given pixel width
pub const fn stride_for(width: usize) -> usize {
    let bits = width * DEPTH;
    bits / 8 + if bits % 8 != 0 { 1 } else { 0 }
}

/// In-memory image of the panel's GDDRAM
///
/// The size is fixed at construction. Reads outside the frame return 0
/// and writes outside it are ignored.
pub struct Framebuffer {
    width: i16,
    height: i16,
    stride: usize,
    buf: Box<[u8]>,
}

impl Framebuffer {
    /// Allocate a zeroed framebuffer
    pub fn new(width: u16, height: u16) -> Self {
        let stride = stride_for(width as usize);
        Self {
            width: width as i16,
            height: height as i16,
            stride,
            buf: vec![0u8; stride * height as usize].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The whole frame, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Packed bytes of row `y`
    ///
    /// # Panics
    /// Panics if `y` is outside the frame.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.buf[start..start + self.stride]
    }

    /// Mutable packed bytes of row `y`
    ///
    /// # Panics
    /// Panics if `y` is outside the frame.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.buf[start..start + self.stride]
    }

    /// Check if `(x, y)` addresses a pixel of this frame
    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn address(&self, x: i16, y: i16) -> usize {
        y as usize * self.stride + x as usize / 2
    }

    /// Read a pixel's 4-bit level
    pub fn pixel(&self, x: i16, y: i16) -> u8 {
        if !self.in_bounds(x, y) {
            return 0;
        }
        let data = self.buf[self.address(x, y)];
        if x % 2 != 0 {
            data & 0x0F
        } else {
            (data & 0xF0) >> 4
        }
    }

    /// Write a pixel's 4-bit level, leaving its byte neighbour untouched
    ///
    /// Only the low nibble of `color` is stored.
    pub fn set_pixel(&mut self, x: i16, y: i16, color: u8) {
        if !self.in_bounds(x, y) {
            return;
        }
        let addr = self.address(x, y);
        let data = self.buf[addr];
        self.buf[addr] = if x % 2 != 0 {
            (data & 0xF0) | (color & 0x0F)
        } else {
            (data & 0x0F) | ((color & 0x0F) << 4)
        };
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: u8) {
        let c = color & 0x0F;
        self.buf.fill((c << 4) | c);
    }
}
