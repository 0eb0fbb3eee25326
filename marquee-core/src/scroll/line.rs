//! Two-phase scroll line buffer
//!
//! One pixel row of scroll content is kept twice, packed two pixels per
//! byte at both nibble phases:
//!
//! ```text
//!   x       0   1   2   3   4   5   6   7
//!   even  [ 0 | 1 ][ 2 | 3 ][ 4 | 5 ][ 6 | 7 ]
//!   odd       [ 1 | 2 ][ 3 | 4 ][ 5 | 6 ][ 7 | ..
//! ```
//!
//! A run of pixels starting at any x, odd or even, is then a plain byte
//! slice of one of the two buffers, ready to copy into the framebuffer.

use alloc::boxed::Box;
use alloc::vec;

/// Bytes per phase buffer
pub const LINE_BYTES: usize = 1024;

/// Pixels one line can hold
pub const LINE_PIXELS: i16 = (LINE_BYTES * 2) as i16;

/// One pixel row of pre-rendered scroll content
pub struct ScrollLineBuffer {
    /// Pixel pairs starting at even x
    even: Box<[u8]>,
    /// Pixel pairs starting at odd x; pixel 0 is not stored here
    odd: Box<[u8]>,
}

impl Default for ScrollLineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollLineBuffer {
    pub fn new() -> Self {
        Self {
            even: vec![0u8; LINE_BYTES].into_boxed_slice(),
            odd: vec![0u8; LINE_BYTES].into_boxed_slice(),
        }
    }

    /// Blank both phases
    pub fn clear(&mut self) {
        self.even.fill(0);
        self.odd.fill(0);
    }

    /// OR `color` into pixel `x` in both phases
    ///
    /// Pixels are never cleared individually; use [`clear`](Self::clear).
    pub fn set_pixel(&mut self, x: i16, color: u8) {
        let color = color & 0x0F;
        if color == 0 || !(0..LINE_PIXELS).contains(&x) {
            return;
        }
        let x = x as usize;
        if x % 2 != 0 {
            self.even[x / 2] |= color;
            self.odd[(x - 1) / 2] |= color << 4;
        } else {
            self.even[x / 2] |= color << 4;
            if x > 0 {
                self.odd[(x - 1) / 2] |= color;
            }
        }
    }

    /// Pixel level at `x`, 0 outside the line
    pub fn pixel(&self, x: i16) -> u8 {
        if !(0..LINE_PIXELS).contains(&x) {
            return 0;
        }
        let data = self.even[x as usize / 2];
        if x % 2 != 0 {
            data & 0x0F
        } else {
            data >> 4
        }
    }

    /// Packed bytes whose first high nibble is pixel `x`
    ///
    /// The slice runs to the end of the phase buffer; callers take the
    /// width they need.
    pub fn data_at(&self, x: i16) -> &[u8] {
        let x = x.clamp(0, LINE_PIXELS - 1) as usize;
        if x % 2 != 0 {
            &self.odd[(x - 1) / 2..]
        } else {
            &self.even[x / 2..]
        }
    }
}
