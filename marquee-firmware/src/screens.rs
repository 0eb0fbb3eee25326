//! The firmware's screens
//!
//! Two screens: the dual-row marquee and a status page. The button
//! toggles between them.

use core::fmt::Write;

use heapless::String;
use marquee_core::config::ScrollTiming;
use marquee_core::scroll::{ROW_COUNT, VIEWPORT_HEIGHT};
use marquee_core::{FontSize, Rectangle, ScrollText};
use marquee_drivers::InterfaceError;
use marquee_ui::{Response, View, ViewId};

use crate::board::Panel;
use crate::channels::ButtonEvent;

pub const NOW_PLAYING: ViewId = 0;
pub const STATUS: ViewId = 1;

/// Number of screens
pub const SCREEN_COUNT: usize = 2;

const ROW_TOP: i16 = 14;
const ROW_FONTS: [FontSize; ROW_COUNT] = [FontSize::Large, FontSize::Small];

const HEADER: u8 = 0x08;
const RULE: u8 = 0x04;

/// Dual-row scrolling marquee
pub struct NowPlaying {
    scroll: ScrollText,
}

impl NowPlaying {
    pub fn new(width: i16, timing: ScrollTiming) -> Self {
        Self {
            scroll: ScrollText::new(width, timing),
        }
    }

    /// Render new text into `row` and restart the scroll cycle
    pub fn set_text(&mut self, panel: &Panel, row: usize, text: &str, now_ms: u32) {
        panel.set_scroll_text(&mut self.scroll, row, text.as_bytes(), ROW_FONTS[row]);
        self.scroll.start_scroll(now_ms);
    }

    fn row_rect(&self, row: usize) -> Rectangle {
        let height = VIEWPORT_HEIGHT as i16;
        Rectangle::new(0, ROW_TOP + row as i16 * height, self.scroll.viewport_width(), height)
    }

    fn refresh(&mut self, panel: &mut Panel) {
        let width = panel.canvas().width();
        panel.draw_ascii(2, 1, b"NOW PLAYING", FontSize::Tiny, HEADER);
        panel.canvas_mut().draw_hline(0, 11, width, RULE);
        for row in 0..ROW_COUNT {
            let rect = self.row_rect(row);
            panel.draw_scroll_text(row, rect.left, rect.top, &self.scroll);
        }
    }

    fn update(&mut self, panel: &mut Panel, now_ms: u32) -> Result<(), InterfaceError> {
        if let Some(row) = self.scroll.update_scroll(now_ms) {
            let rect = self.row_rect(row);
            panel.draw_scroll_text(row, rect.left, rect.top, &self.scroll);
            panel.present_rect(rect)?;
        }
        Ok(())
    }
}

const UPTIME_AREA: Rectangle = Rectangle::new(4, 44, 56, 14);

/// Static device info plus a running uptime
pub struct Status {
    icons: Option<usize>,
    seconds: u32,
}

impl Status {
    /// `icons` is the handle of a loaded sprite list, if any
    pub fn new(icons: Option<usize>) -> Self {
        Self { icons, seconds: 0 }
    }

    fn refresh(&mut self, panel: &mut Panel) {
        panel.draw_ascii(4, 2, b"Marquee", FontSize::Large, 0x0F);
        if let Some(handle) = self.icons {
            let x = panel.canvas().width() - panel.images(handle).image_width() - 4;
            panel.draw_image(x, 2, handle, 0);
        }
        panel.draw_ascii(4, 24, b"SSD1322 256x64", FontSize::Small, 0x0A);
        self.draw_uptime(panel);
    }

    fn draw_uptime(&self, panel: &mut Panel) {
        let mut text: String<16> = String::new();
        let (h, m, s) = (self.seconds / 3600, self.seconds / 60 % 60, self.seconds % 60);
        // 16 bytes always holds "up 1193046:59:59"
        let _ = write!(text, "up {}:{:02}:{:02}", h, m, s);
        panel.draw_ascii(UPTIME_AREA.left, UPTIME_AREA.top, text.as_bytes(), FontSize::Small, 0x0C);
    }

    fn update(&mut self, panel: &mut Panel, now_ms: u32) -> Result<(), InterfaceError> {
        let seconds = now_ms / 1000;
        if seconds == self.seconds {
            return Ok(());
        }
        self.seconds = seconds;
        panel.canvas_mut().fill_rect(UPTIME_AREA, 0);
        self.draw_uptime(panel);
        panel.present_rect(UPTIME_AREA)
    }
}

/// Every screen the firmware can show
pub enum Screen {
    NowPlaying(NowPlaying),
    Status(Status),
}

impl View<Panel> for Screen {
    type Input = ButtonEvent;

    fn refresh(&mut self, panel: &mut Panel) -> Result<(), InterfaceError> {
        match self {
            Screen::NowPlaying(view) => view.refresh(panel),
            Screen::Status(view) => view.refresh(panel),
        }
        Ok(())
    }

    fn update(&mut self, panel: &mut Panel, now_ms: u32) -> Result<(), InterfaceError> {
        match self {
            Screen::NowPlaying(view) => view.update(panel, now_ms),
            Screen::Status(view) => view.update(panel, now_ms),
        }
    }

    fn handle_input(&mut self, _panel: &mut Panel, input: ButtonEvent) -> Result<Response, InterfaceError> {
        Ok(match (self, input) {
            (Screen::NowPlaying(_), ButtonEvent::Press) => Response::Switch(STATUS),
            (Screen::Status(_), ButtonEvent::Press) => Response::Switch(NOW_PLAYING),
            _ => Response::Ignored,
        })
    }
}
