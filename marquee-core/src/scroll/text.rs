//! Dual-row scrolling text
//!
//! Each of the two rows is rendered once into 16 [`ScrollLineBuffer`]s.
//! Text wider than the viewport is laid out as
//!
//! ```text
//!   [ content W ][ blank V ][ content W ]
//! ```
//!
//! and its recorded width becomes `W + V`. Any viewport-wide window
//! starting inside `[0, W + V)` is then a contiguous read, and the
//! window at `W + V` looks exactly like the one at 0, so the row wraps
//! without special cases.
//!
//! Only one row moves at a time. The state machine pauses with both rows
//! still, scrolls row 0 through one full pass if it needs it, then row 1,
//! then pauses again.

use marquee_hal::clock::deadline_reached;

use super::line::{ScrollLineBuffer, LINE_PIXELS};
use crate::config::ScrollTiming;
use crate::font::{codes, Font};

/// Pixel rows per text row
pub const VIEWPORT_HEIGHT: usize = 16;

/// Text rows per scroll text
pub const ROW_COUNT: usize = 2;

/// Widest viewport for which `2W + V` still fits a line with `W > V`
pub const MAX_VIEWPORT_WIDTH: i16 = (LINE_PIXELS / 3) & !1;

/// Scroll animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollState {
    /// Both rows stationary, waiting for the pause deadline
    Static,
    /// Row 0 is moving
    ScrollingRow0,
    /// Row 1 is moving
    ScrollingRow1,
}

/// Two rows of pre-rendered, horizontally scrolling text
pub struct ScrollText {
    viewport_width: i16,
    lines: [ScrollLineBuffer; VIEWPORT_HEIGHT * ROW_COUNT],
    text_width: [i16; ROW_COUNT],
    state: ScrollState,
    next_tick: u32,
    offset: i16,
    timing: ScrollTiming,
}

impl ScrollText {
    /// Create an empty scroll text for a viewport `width` pixels wide
    ///
    /// The width is rounded down to an even value so rows copy as whole
    /// bytes, and capped at [`MAX_VIEWPORT_WIDTH`].
    pub fn new(width: i16, timing: ScrollTiming) -> Self {
        let viewport_width = width.clamp(0, MAX_VIEWPORT_WIDTH) & !1;
        Self {
            viewport_width,
            lines: core::array::from_fn(|_| ScrollLineBuffer::new()),
            text_width: [0; ROW_COUNT],
            state: ScrollState::Static,
            next_tick: 0,
            offset: 0,
            timing,
        }
    }

    /// Visible width in pixels (always even)
    pub fn viewport_width(&self) -> i16 {
        self.viewport_width
    }

    /// Recorded content width of `row`
    ///
    /// Equal to the viewport width for rows that fit, `W + V` for rows
    /// that scroll.
    pub fn text_width(&self, row: usize) -> i16 {
        self.text_width[row]
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Read position of the moving row
    pub fn offset(&self) -> i16 {
        self.offset
    }

    /// Check whether `row` is wider than the viewport
    pub fn needs_scroll(&self, row: usize) -> bool {
        self.text_width[row] > self.viewport_width
    }

    /// Check whether `row` is the one currently moving
    pub fn is_scrolling(&self, row: usize) -> bool {
        matches!(
            (row, self.state),
            (0, ScrollState::ScrollingRow0) | (1, ScrollState::ScrollingRow1)
        )
    }

    /// Render `text` into `row` from scratch
    ///
    /// Codes without a glyph are skipped. Content that would not fit the
    /// line twice plus a blank viewport is clipped.
    ///
    /// # Panics
    /// Panics if `row >= ROW_COUNT`.
    pub fn set_text(&mut self, row: usize, text: &[u8], font: &Font) {
        assert!(row < ROW_COUNT, "scroll text has two rows");
        let max_width = (LINE_PIXELS - self.viewport_width) / 2;
        let lines = &mut self.lines[row * VIEWPORT_HEIGHT..(row + 1) * VIEWPORT_HEIGHT];
        for line in lines.iter_mut() {
            line.clear();
        }

        let mut x: i16 = 0;
        for code in codes(text) {
            if x >= max_width {
                break;
            }
            let Some(glyph) = font.glyph(code) else {
                continue;
            };
            for (i, &column) in glyph.columns().iter().enumerate() {
                let px = x + i as i16;
                if px >= max_width {
                    break;
                }
                for (j, line) in lines.iter_mut().enumerate() {
                    if column & (1 << j) != 0 {
                        line.set_pixel(px, 0x0F);
                    }
                }
            }
            x = x.saturating_add(glyph.advance());
        }
        let width = x.clamp(0, max_width);
        debug!("scroll width [{}] : {}", row, width);

        if width > self.viewport_width {
            let copy_at = width + self.viewport_width;
            for line in lines.iter_mut() {
                for i in 0..width {
                    let p = line.pixel(i);
                    line.set_pixel(copy_at + i, p);
                }
            }
            self.text_width[row] = width + self.viewport_width;
        } else {
            self.text_width[row] = self.viewport_width;
        }

        if self.is_scrolling(row) && self.offset >= self.text_width[row] {
            self.offset = 0;
        }
    }

    /// Stop any motion and wait one pause before the next pass
    pub fn start_scroll(&mut self, now_ms: u32) {
        self.state = ScrollState::Static;
        self.offset = 0;
        self.next_tick = now_ms.wrapping_add(self.timing.pause_ms);
    }

    /// Advance the animation to `now_ms`
    ///
    /// Returns the row whose pixels changed, if any. At most one step is
    /// taken per call.
    pub fn update_scroll(&mut self, now_ms: u32) -> Option<usize> {
        if !deadline_reached(now_ms, self.next_tick) {
            return None;
        }

        match self.state {
            ScrollState::Static => {
                if self.needs_scroll(0) {
                    self.state = ScrollState::ScrollingRow0;
                } else if self.needs_scroll(1) {
                    self.state = ScrollState::ScrollingRow1;
                } else {
                    return None;
                }
                self.offset = 0;
                self.next_tick = now_ms.wrapping_add(self.timing.interval_ms);
                None
            }
            ScrollState::ScrollingRow0 => {
                self.offset += 1;
                if self.offset >= self.text_width[0] {
                    self.offset = 0;
                    if self.needs_scroll(1) {
                        self.state = ScrollState::ScrollingRow1;
                        self.next_tick = self.next_tick.wrapping_add(self.timing.interval_ms);
                    } else {
                        self.state = ScrollState::Static;
                        self.next_tick = now_ms.wrapping_add(self.timing.pause_ms);
                    }
                } else {
                    self.next_tick = self.next_tick.wrapping_add(self.timing.interval_ms);
                }
                Some(0)
            }
            ScrollState::ScrollingRow1 => {
                self.offset += 1;
                if self.offset >= self.text_width[1] {
                    self.offset = 0;
                    self.state = ScrollState::Static;
                    self.next_tick = now_ms.wrapping_add(self.timing.pause_ms);
                } else {
                    self.next_tick = self.next_tick.wrapping_add(self.timing.interval_ms);
                }
                Some(1)
            }
        }
    }

    /// Packed bytes of pixel row `dy` of `row`, one viewport wide
    ///
    /// The moving row is read at the current offset, every other row at 0.
    ///
    /// # Panics
    /// Panics if `row >= ROW_COUNT` or `dy >= VIEWPORT_HEIGHT`.
    pub fn line_data(&self, row: usize, dy: usize) -> &[u8] {
        let x = if self.is_scrolling(row) { self.offset } else { 0 };
        self.slice_at(row, dy, x)
    }

    /// Packed bytes of pixel row `dy` of `row` starting at content x
    ///
    /// `x` is clamped so the window stays inside the line.
    ///
    /// # Panics
    /// Panics if `row >= ROW_COUNT` or `dy >= VIEWPORT_HEIGHT`.
    pub fn slice_at(&self, row: usize, dy: usize, x: i16) -> &[u8] {
        assert!(row < ROW_COUNT && dy < VIEWPORT_HEIGHT);
        let len = self.viewport_width as usize / 2;
        let x = x.clamp(0, LINE_PIXELS - self.viewport_width);
        &self.lines[row * VIEWPORT_HEIGHT + dy].data_at(x)[..len]
    }

    /// Pixel level of content x in pixel row `dy` of `row`
    pub fn content_pixel(&self, row: usize, dy: usize, x: i16) -> u8 {
        self.lines[row * VIEWPORT_HEIGHT + dy].pixel(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::font_file;
    use proptest::prelude::*;

    const VIEWPORT: i16 = 236;

    /// 8 px wide blocks that advance 10 px: 'H','E','L','O' plus 'X'
    fn block_font() -> Font {
        let data = font_file(&[
            (b'H' as u16, 0, 10, &[0xFFFF; 8]),
            (b'E' as u16, 0, 10, &[0x00FF; 8]),
            (b'L' as u16, 0, 10, &[0xFF00; 8]),
            (b'O' as u16, 0, 10, &[0x0F0F; 8]),
            (b'X' as u16, 0, 10, &[0x8001; 8]),
        ]);
        Font::read_from(data.as_slice(), 16).unwrap()
    }

    fn long_text() -> &'static [u8] {
        // 30 glyphs * 10 px = 300 px > 236
        b"HELLOXHELLOXHELLOXHELLOXHELLOX"
    }

    fn nibble(slice: &[u8], i: usize) -> u8 {
        let b = slice[i / 2];
        if i % 2 == 0 {
            b >> 4
        } else {
            b & 0x0F
        }
    }

    #[test]
    fn test_viewport_forced_even() {
        let text = ScrollText::new(237, ScrollTiming::default());
        assert_eq!(text.viewport_width(), 236);
    }

    #[test]
    fn test_short_text_never_scrolls() {
        let font = block_font();
        let mut text = ScrollText::new(VIEWPORT, ScrollTiming::default());
        text.set_text(0, b"HELLO", &font);
        assert_eq!(text.text_width(0), VIEWPORT);

        text.start_scroll(0);
        for now in (0..20_000).step_by(40) {
            assert_eq!(text.update_scroll(now), None);
            assert_eq!(text.state(), ScrollState::Static);
        }
    }

    #[test]
    fn test_long_text_is_padded_and_duplicated() {
        let font = block_font();
        let mut text = ScrollText::new(VIEWPORT, ScrollTiming::default());
        text.set_text(1, long_text(), &font);
        assert_eq!(text.text_width(1), 300 + VIEWPORT);
        assert!(text.needs_scroll(1));

        for dy in 0..VIEWPORT_HEIGHT {
            for x in 0..300 {
                assert_eq!(
                    text.content_pixel(1, dy, x),
                    text.content_pixel(1, dy, 300 + VIEWPORT + x)
                );
            }
            for x in 300..300 + VIEWPORT {
                assert_eq!(text.content_pixel(1, dy, x), 0);
            }
        }
    }

    #[test]
    fn test_missing_glyphs_take_no_space() {
        let font = block_font();
        let mut text = ScrollText::new(40, ScrollTiming::default());
        text.set_text(0, b"H?H", &font);
        // two glyphs of advance 10 fit in 40
        assert_eq!(text.text_width(0), 40);
        assert_eq!(text.content_pixel(0, 0, 10), 0x0F);
    }

    #[test]
    fn test_pause_then_scroll_row0_then_row1() {
        let font = block_font();
        let timing = ScrollTiming::default();
        let mut text = ScrollText::new(VIEWPORT, timing);
        text.set_text(0, long_text(), &font);
        text.set_text(1, long_text(), &font);
        text.start_scroll(1000);

        assert_eq!(text.update_scroll(1000 + timing.pause_ms - 1), None);
        assert_eq!(text.state(), ScrollState::Static);

        let mut now = 1000 + timing.pause_ms;
        assert_eq!(text.update_scroll(now), None);
        assert_eq!(text.state(), ScrollState::ScrollingRow0);

        // Not due yet
        assert_eq!(text.update_scroll(now + timing.interval_ms - 1), None);

        let width = text.text_width(0) as u32;
        for step in 1..width {
            now += timing.interval_ms;
            assert_eq!(text.update_scroll(now), Some(0));
            assert_eq!(text.offset() as u32, step);
        }
        now += timing.interval_ms;
        assert_eq!(text.update_scroll(now), Some(0));
        assert_eq!(text.state(), ScrollState::ScrollingRow1);
        assert_eq!(text.offset(), 0);

        for _ in 0..text.text_width(1) {
            now += timing.interval_ms;
            assert_eq!(text.update_scroll(now), Some(1));
        }
        assert_eq!(text.state(), ScrollState::Static);
    }

    #[test]
    fn test_only_row1_scrolls() {
        let font = block_font();
        let timing = ScrollTiming::default();
        let mut text = ScrollText::new(VIEWPORT, timing);
        text.set_text(0, b"HI", &font);
        text.set_text(1, long_text(), &font);
        text.start_scroll(0);
        assert_eq!(text.update_scroll(timing.pause_ms), None);
        assert_eq!(text.state(), ScrollState::ScrollingRow1);
        assert!(text.is_scrolling(1));
        assert!(!text.is_scrolling(0));
    }

    #[test]
    fn test_row0_pass_returns_to_static() {
        let font = block_font();
        let timing = ScrollTiming {
            interval_ms: 1,
            pause_ms: 10,
        };
        let mut text = ScrollText::new(VIEWPORT, timing);
        text.set_text(0, long_text(), &font);
        text.start_scroll(0);
        let mut now = 10;
        text.update_scroll(now);
        for _ in 0..text.text_width(0) {
            now += 1;
            assert_eq!(text.update_scroll(now), Some(0));
        }
        assert_eq!(text.state(), ScrollState::Static);
        // fresh pause before the next pass
        assert_eq!(text.update_scroll(now + 9), None);
        assert_eq!(text.state(), ScrollState::Static);
        text.update_scroll(now + 10);
        assert_eq!(text.state(), ScrollState::ScrollingRow0);
    }

    #[test]
    fn test_line_data_follows_offset() {
        let font = block_font();
        let timing = ScrollTiming {
            interval_ms: 1,
            pause_ms: 0,
        };
        let mut text = ScrollText::new(VIEWPORT, timing);
        text.set_text(0, long_text(), &font);
        text.start_scroll(0);
        text.update_scroll(0);
        for now in 1..=3 {
            text.update_scroll(now);
        }
        assert_eq!(text.offset(), 3);
        assert_eq!(text.line_data(0, 0), text.slice_at(0, 0, 3));
        assert_eq!(text.line_data(1, 0), text.slice_at(1, 0, 0));
    }

    #[test]
    fn test_slice_at_clamps_past_line_end() {
        let font = block_font();
        let mut text = ScrollText::new(VIEWPORT, ScrollTiming::default());
        text.set_text(0, long_text(), &font);
        let len = VIEWPORT as usize / 2;
        let tail = text.slice_at(0, 0, LINE_PIXELS - VIEWPORT);
        assert_eq!(tail.len(), len);
        assert_eq!(text.slice_at(0, 0, LINE_PIXELS - 1), tail);
        assert_eq!(text.slice_at(0, 0, i16::MAX), tail);
        assert_eq!(text.slice_at(0, 0, -7), text.slice_at(0, 0, 0));
    }

    #[test]
    fn test_overlong_text_clipped() {
        let font = block_font();
        let mut text = ScrollText::new(VIEWPORT, ScrollTiming::default());
        let long = [b'H'; 400];
        text.set_text(0, &long, &font);
        let max = (LINE_PIXELS - VIEWPORT) / 2;
        assert_eq!(text.text_width(0), max + VIEWPORT);
        // the widest window still fits the buffer
        let last = text.slice_at(0, 0, text.text_width(0) - 1);
        assert_eq!(last.len(), VIEWPORT as usize / 2);
    }

    proptest! {
        #[test]
        fn prop_window_wraps_seamlessly(offset_seed in any::<u16>(), dy in 0usize..VIEWPORT_HEIGHT) {
            let font = block_font();
            let mut text = ScrollText::new(VIEWPORT, ScrollTiming::default());
            text.set_text(0, long_text(), &font);
            let total = text.text_width(0);
            let o = (offset_seed % total as u16) as i16;

            let window = text.slice_at(0, dy, o);
            prop_assert_eq!(window.len(), VIEWPORT as usize / 2);
            for i in 0..VIEWPORT as usize {
                let wrapped = (o + i as i16) % total;
                prop_assert_eq!(nibble(window, i), text.content_pixel(0, dy, wrapped));
            }
        }
    }
}
