//! Drawing primitives over the framebuffer
//!
//! A [`Canvas`] owns the framebuffer and the optional popup region.
//! While a popup is enabled, every primitive leaves the pixels inside it
//! alone unless a [`PopupDrawing`] scope is active, so ordinary screen
//! redraws can run underneath an overlay without knowing it is there.

use core::ops::{Deref, DerefMut};

use crate::font::{codes, Font};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rectangle;
use crate::image::Image;
use crate::scroll::{ScrollText, VIEWPORT_HEIGHT};

/// Framebuffer plus popup bookkeeping
pub struct Canvas {
    fb: Framebuffer,
    popup: Rectangle,
    popup_drawing: bool,
}

impl Canvas {
    /// Create a blank canvas of `width` x `height` pixels
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            fb: Framebuffer::new(width, height),
            popup: Rectangle::empty(),
            popup_drawing: false,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn width(&self) -> i16 {
        self.fb.width()
    }

    pub fn height(&self) -> i16 {
        self.fb.height()
    }

    /// Whole-screen rectangle
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0, 0, self.fb.width(), self.fb.height())
    }

    /// Read back a pixel level
    pub fn pixel(&self, x: i16, y: i16) -> u8 {
        self.fb.pixel(x, y)
    }

    fn is_protected(&self, x: i16, y: i16) -> bool {
        !self.popup_drawing && !self.popup.is_empty() && self.popup.contains(x, y)
    }

    /// Set one pixel; out-of-range and popup-protected writes are dropped
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: u8) {
        if self.is_protected(x, y) {
            return;
        }
        self.fb.set_pixel(x, y, color);
    }

    /// Horizontal run of `len` pixels starting at `(x, y)`
    pub fn draw_hline(&mut self, x: i16, y: i16, len: i16, color: u8) {
        for px in x..x.saturating_add(len) {
            self.draw_pixel(px, y, color);
        }
    }

    /// Vertical run of `len` pixels starting at `(x, y)`
    pub fn draw_vline(&mut self, x: i16, y: i16, len: i16, color: u8) {
        for py in y..y.saturating_add(len) {
            self.draw_pixel(x, py, color);
        }
    }

    /// One-pixel outline of `rc`
    pub fn draw_rect(&mut self, rc: Rectangle, color: u8) {
        if rc.is_empty() {
            return;
        }
        self.draw_hline(rc.left, rc.top, rc.width, color);
        self.draw_vline(rc.left, rc.top, rc.height, color);
        self.draw_hline(rc.left, rc.bottom(), rc.width, color);
        self.draw_vline(rc.right(), rc.top, rc.height, color);
    }

    /// Fill `rc` with `color`
    pub fn fill_rect(&mut self, rc: Rectangle, color: u8) {
        for y in rc.top..rc.top.saturating_add(rc.height) {
            self.draw_hline(rc.left, y, rc.width, color);
        }
    }

    /// Set every pixel to `color`, popup region included
    pub fn clear(&mut self, color: u8) {
        self.fb.fill(color);
    }

    /// Draw the glyph for `code` with its top-left at `(x, y)`
    ///
    /// Returns the cursor position after the glyph, or `x` unchanged
    /// when the font has no glyph for `code`.
    pub fn draw_char(&mut self, x: i16, y: i16, code: u16, font: &Font, color: u8) -> i16 {
        let Some(glyph) = font.glyph(code) else {
            return x;
        };
        let left = x.saturating_add(glyph.offset()).max(0);
        for j in 0..font.height() {
            for i in 0..glyph.width() {
                if glyph.is_set(i, j) {
                    self.draw_pixel(left.saturating_add(i), y.saturating_add(j), color);
                }
            }
        }
        x.saturating_add(glyph.advance())
    }

    /// Draw one glyph per byte of `text`
    pub fn draw_ascii(&mut self, mut x: i16, y: i16, text: &[u8], font: &Font, color: u8) -> i16 {
        for &b in text.iter().take_while(|&&b| b != 0) {
            x = self.draw_char(x, y, b as u16, font, color);
        }
        x
    }

    /// Draw multi-byte `text` decoded to display codes
    pub fn draw_string(&mut self, mut x: i16, y: i16, text: &[u8], font: &Font, color: u8) -> i16 {
        for code in codes(text) {
            x = self.draw_char(x, y, code, font, color);
        }
        x
    }

    /// Copy every pixel of `image` with its top-left at `(x, y)`
    pub fn draw_image(&mut self, x: i16, y: i16, image: &Image) {
        for j in 0..image.height() {
            for i in 0..image.width() {
                self.draw_pixel(x.saturating_add(i), y.saturating_add(j), image.pixel(i, j));
            }
        }
    }

    /// Copy the visible window of scroll text `row` to `(x, y)`
    ///
    /// With `x` even the rows are copied byte by byte; bytes touching a
    /// protected popup fall back to per-pixel writes so only the
    /// pixels outside the popup change.
    pub fn draw_scroll_text(&mut self, row: usize, x: i16, y: i16, text: &ScrollText) {
        let width = text.viewport_width();
        for dy in 0..VIEWPORT_HEIGHT {
            let py = y.saturating_add(dy as i16);
            if py < 0 || py >= self.fb.height() {
                continue;
            }
            let data = text.line_data(row, dy);

            if x % 2 != 0 {
                for i in 0..width {
                    let b = data[i as usize / 2];
                    let level = if i % 2 == 0 { b >> 4 } else { b & 0x0F };
                    self.draw_pixel(x.saturating_add(i), py, level);
                }
                continue;
            }

            for (i, &byte) in data.iter().enumerate() {
                let px = x.saturating_add(2 * i as i16);
                if px < 0 || px >= self.fb.width() {
                    continue;
                }
                if self.is_protected(px, py) || self.is_protected(px + 1, py) {
                    self.draw_pixel(px, py, byte >> 4);
                    self.draw_pixel(px + 1, py, byte & 0x0F);
                } else {
                    self.fb.row_mut(py as usize)[px as usize / 2] = byte;
                }
            }
        }
    }

    /// Protect `rc` from ordinary drawing
    pub fn enable_popup(&mut self, rc: Rectangle) {
        debug!("popup enabled");
        self.popup = rc;
        self.popup_drawing = false;
    }

    /// Drop the popup region; everything is drawable again
    pub fn disable_popup(&mut self) {
        debug!("popup disabled");
        self.popup.clear();
        self.popup_drawing = false;
    }

    /// The protected region, if a popup is enabled
    pub fn popup(&self) -> Option<Rectangle> {
        (!self.popup.is_empty()).then_some(self.popup)
    }

    /// Check whether writes inside the popup are currently allowed
    pub fn is_popup_drawing(&self) -> bool {
        self.popup_drawing
    }

    /// Let writes reach the popup region until [`end_popup_drawing`]
    ///
    /// Has no effect while no popup is enabled.
    ///
    /// [`end_popup_drawing`]: Canvas::end_popup_drawing
    pub fn begin_popup_drawing(&mut self) {
        if !self.popup.is_empty() {
            self.popup_drawing = true;
        }
    }

    pub fn end_popup_drawing(&mut self) {
        self.popup_drawing = false;
    }

    /// Open a scope in which the popup region accepts writes
    ///
    /// Without an enabled popup the scope changes nothing. The scope ends
    /// when the returned guard is dropped.
    pub fn popup_drawing(&mut self) -> PopupDrawing<'_> {
        self.begin_popup_drawing();
        PopupDrawing { canvas: self }
    }
}

/// Scope guard that lets drawing reach the popup region
pub struct PopupDrawing<'a> {
    canvas: &'a mut Canvas,
}

impl Deref for PopupDrawing<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for PopupDrawing<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for PopupDrawing<'_> {
    fn drop(&mut self) {
        self.canvas.end_popup_drawing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollTiming;
    use crate::font::tests::font_file;
    use crate::image::Image;
    use proptest::prelude::*;

    const POPUP: Rectangle = Rectangle::new(64, 48, 128, 16);

    fn font_a() -> Font {
        let data = font_file(&[(0x0041, 0, 6, &[0x00FF; 5])]);
        Font::read_from(data.as_slice(), 8).unwrap()
    }

    #[test]
    fn test_draw_char_sets_glyph_pixels() {
        let font = font_a();
        let mut canvas = Canvas::new(256, 64);
        let next = canvas.draw_char(0, 0, 0x0041, &font, 0x0C);
        assert_eq!(next, 6);
        for y in 0..10 {
            for x in 0..8 {
                let expected = if x < 5 && y < 8 { 0x0C } else { 0 };
                assert_eq!(canvas.pixel(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_draw_char_unknown_code() {
        let font = font_a();
        let mut canvas = Canvas::new(256, 64);
        assert_eq!(canvas.draw_char(17, 3, 0x1234, &font, 0x0F), 17);
        assert!(canvas.framebuffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_far_off_screen_is_dropped() {
        let font = font_a();
        let mut canvas = Canvas::new(256, 64);
        assert_eq!(canvas.draw_char(i16::MAX - 2, i16::MAX - 3, 0x0041, &font, 0x0F), i16::MAX);
        let image = Image::from_packed(4, 2, &[0xFF; 4]).unwrap();
        canvas.draw_image(i16::MAX - 1, i16::MAX - 1, &image);
        canvas.fill_rect(Rectangle::new(i16::MAX - 1, 0, 10, 10), 0x0F);
        assert!(canvas.framebuffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_string_advances_and_skips() {
        let font = font_a();
        let mut canvas = Canvas::new(256, 64);
        assert_eq!(canvas.draw_string(10, 0, b"A?A", &font, 0x0F), 22);
        assert_eq!(canvas.draw_ascii(0, 20, b"AA\0A", &font, 0x0F), 12);
    }

    #[test]
    fn test_negative_bearing_clamped_to_left_edge() {
        let data = font_file(&[(0x41, -3, 4, &[0x0001])]);
        let font = Font::read_from(data.as_slice(), 1).unwrap();
        let mut canvas = Canvas::new(16, 4);
        canvas.draw_char(0, 0, 0x41, &font, 0x0F);
        assert_eq!(canvas.pixel(0, 0), 0x0F);
    }

    #[test]
    fn test_rect_outline_and_fill() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_rect(Rectangle::new(2, 2, 4, 3), 0x0F);
        assert_eq!(canvas.pixel(2, 2), 0x0F);
        assert_eq!(canvas.pixel(5, 4), 0x0F);
        assert_eq!(canvas.pixel(3, 3), 0);

        canvas.fill_rect(Rectangle::new(2, 2, 4, 3), 0x07);
        assert_eq!(canvas.pixel(3, 3), 0x07);
        assert_eq!(canvas.pixel(6, 3), 0);
    }

    #[test]
    fn test_lines_clip_at_edges() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_hline(-4, 0, 16, 0x0F);
        canvas.draw_vline(7, -4, 16, 0x0F);
        assert_eq!(canvas.pixel(0, 0), 0x0F);
        assert_eq!(canvas.pixel(7, 7), 0x0F);
    }

    #[test]
    fn test_popup_blocks_until_scope() {
        let mut canvas = Canvas::new(256, 64);
        canvas.enable_popup(POPUP);
        canvas.draw_pixel(100, 50, 0x0F);
        assert_eq!(canvas.pixel(100, 50), 0);
        canvas.draw_pixel(10, 10, 0x0F);
        assert_eq!(canvas.pixel(10, 10), 0x0F);

        {
            let mut scope = canvas.popup_drawing();
            scope.draw_pixel(100, 50, 0x0F);
            assert!(scope.is_popup_drawing());
        }
        assert_eq!(canvas.pixel(100, 50), 0x0F);
        assert!(!canvas.is_popup_drawing());

        canvas.draw_pixel(100, 50, 0x00);
        assert_eq!(canvas.pixel(100, 50), 0x0F);

        canvas.disable_popup();
        canvas.draw_pixel(100, 50, 0x00);
        assert_eq!(canvas.pixel(100, 50), 0x00);
    }

    #[test]
    fn test_scope_without_popup_is_inert() {
        let mut canvas = Canvas::new(16, 16);
        let scope = canvas.popup_drawing();
        assert!(!scope.is_popup_drawing());
    }

    #[test]
    fn test_draw_image() {
        let image = Image::from_packed(4, 1, &[0x12, 0x34]).unwrap();
        let mut canvas = Canvas::new(16, 4);
        canvas.draw_image(3, 2, &image);
        assert_eq!(canvas.pixel(3, 2), 1);
        assert_eq!(canvas.pixel(6, 2), 4);
    }

    fn scrolling_text() -> (Font, ScrollText) {
        let data = font_file(&[(b'W' as u16, 0, 8, &[0xFFFF; 8])]);
        let font = Font::read_from(data.as_slice(), 16).unwrap();
        let mut text = ScrollText::new(40, ScrollTiming::default());
        text.set_text(0, b"WW", &font);
        (font, text)
    }

    #[test]
    fn test_scroll_text_blit() {
        let (_font, text) = scrolling_text();
        let mut canvas = Canvas::new(64, 32);
        canvas.draw_scroll_text(0, 4, 2, &text);
        assert_eq!(canvas.pixel(4, 2), 0x0F);
        assert_eq!(canvas.pixel(19, 17), 0x0F);
        assert_eq!(canvas.pixel(20, 2), 0);
        assert_eq!(canvas.pixel(3, 2), 0);
    }

    #[test]
    fn test_scroll_text_odd_x() {
        let (_font, text) = scrolling_text();
        let mut canvas = Canvas::new(64, 32);
        canvas.draw_scroll_text(0, 5, 0, &text);
        assert_eq!(canvas.pixel(4, 0), 0);
        assert_eq!(canvas.pixel(5, 0), 0x0F);
        assert_eq!(canvas.pixel(20, 0), 0x0F);
        assert_eq!(canvas.pixel(21, 0), 0);
    }

    #[test]
    fn test_scroll_text_respects_popup() {
        let (_font, text) = scrolling_text();
        let mut canvas = Canvas::new(64, 32);
        canvas.enable_popup(Rectangle::new(9, 0, 4, 4));
        canvas.draw_scroll_text(0, 4, 0, &text);
        assert_eq!(canvas.pixel(8, 0), 0x0F);
        assert_eq!(canvas.pixel(9, 0), 0);
        assert_eq!(canvas.pixel(12, 3), 0);
        assert_eq!(canvas.pixel(13, 0), 0x0F);
        assert_eq!(canvas.pixel(10, 4), 0x0F);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Pixel(i16, i16, u8),
        HLine(i16, i16, i16, u8),
        VLine(i16, i16, i16, u8),
        Rect(Rectangle, u8),
        Fill(Rectangle, u8),
        Char(i16, i16, u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        let coord = (-8i16..264, -8i16..72);
        let rect = (-8i16..264, -8i16..72, 0i16..80, 0i16..40)
            .prop_map(|(l, t, w, h)| Rectangle::new(l, t, w, h));
        prop_oneof![
            (coord.clone(), 1u8..16).prop_map(|((x, y), c)| Op::Pixel(x, y, c)),
            (coord.clone(), 0i16..300, 1u8..16).prop_map(|((x, y), l, c)| Op::HLine(x, y, l, c)),
            (coord.clone(), 0i16..80, 1u8..16).prop_map(|((x, y), l, c)| Op::VLine(x, y, l, c)),
            (rect.clone(), 1u8..16).prop_map(|(r, c)| Op::Rect(r, c)),
            (rect, 1u8..16).prop_map(|(r, c)| Op::Fill(r, c)),
            (coord, 1u8..16).prop_map(|((x, y), c)| Op::Char(x, y, c)),
        ]
    }

    fn apply(canvas: &mut Canvas, font: &Font, op: &Op) {
        match *op {
            Op::Pixel(x, y, c) => canvas.draw_pixel(x, y, c),
            Op::HLine(x, y, l, c) => canvas.draw_hline(x, y, l, c),
            Op::VLine(x, y, l, c) => canvas.draw_vline(x, y, l, c),
            Op::Rect(r, c) => canvas.draw_rect(r, c),
            Op::Fill(r, c) => canvas.fill_rect(r, c),
            Op::Char(x, y, c) => {
                canvas.draw_char(x, y, 0x41, font, c);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_popup_pixels_untouched(ops in proptest::collection::vec(op(), 1..20)) {
            let font = font_a();
            let mut canvas = Canvas::new(256, 64);
            canvas.enable_popup(POPUP);
            for op in &ops {
                apply(&mut canvas, &font, op);
            }
            for y in POPUP.top..=POPUP.bottom() {
                for x in POPUP.left..=POPUP.right() {
                    prop_assert_eq!(canvas.pixel(x, y), 0);
                }
            }
        }

        #[test]
        fn prop_popup_scope_allows_writes(x in 64i16..192, y in 48i16..64, c in 1u8..16) {
            let mut canvas = Canvas::new(256, 64);
            canvas.enable_popup(POPUP);
            canvas.popup_drawing().draw_pixel(x, y, c);
            prop_assert_eq!(canvas.pixel(x, y), c);
        }
    }
}
