//! Display context
//!
//! One [`Display`] is built at startup and passed by reference to
//! whatever draws. It owns the panel driver, the canvas, the three font
//! slots and every loaded sprite list for the lifetime of the program.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use marquee_core::config::{FontSize, FontSpec};
use marquee_core::{AssetError, Canvas, Font, ImageList, Rectangle, ScrollText};
use marquee_hal::AssetStorage;

use crate::interface::{DisplayInterface, InterfaceError};
use crate::ssd1322::Ssd1322;

/// Panel, framebuffer and assets
pub struct Display<DI, D> {
    panel: Ssd1322<DI, D>,
    canvas: Canvas,
    fonts: [Option<Font>; FontSize::COUNT],
    images: Vec<ImageList>,
}

impl<DI, D> Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayNs,
{
    /// Wrap a panel driver with a blank canvas of the panel's size
    pub fn new(panel: Ssd1322<DI, D>) -> Self {
        let cfg = panel.config();
        let canvas = Canvas::new(cfg.width, cfg.height);
        Self {
            panel,
            canvas,
            fonts: [None, None, None],
            images: Vec::new(),
        }
    }

    /// Configure the controller and push a blank frame
    pub fn init(&mut self) -> Result<(), InterfaceError> {
        self.panel.init()?;
        self.canvas.clear(0);
        self.present_all()
    }

    pub fn panel(&self) -> &Ssd1322<DI, D> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Ssd1322<DI, D> {
        &mut self.panel
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Load every font in `specs` into its slot
    ///
    /// Each font is attempted even if an earlier one failed. A failed slot
    /// is left empty and the first error is returned.
    pub fn load_fonts<S: AssetStorage>(&mut self, storage: &mut S, specs: &[FontSpec]) -> Result<(), AssetError> {
        let mut result = Ok(());
        for spec in specs {
            match Font::load(storage, &spec.path, spec.height) {
                Ok(font) => self.fonts[spec.size.index()] = Some(font),
                Err(e) => {
                    warn!("font slot {} unavailable: {}", spec.size, e);
                    self.fonts[spec.size.index()] = None;
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
            }
        }
        result
    }

    /// Put `font` into the `size` slot
    pub fn set_font(&mut self, size: FontSize, font: Font) {
        self.fonts[size.index()] = Some(font);
    }

    /// Font in the `size` slot, if loaded
    pub fn font(&self, size: FontSize) -> Option<&Font> {
        self.fonts[size.index()].as_ref()
    }

    /// Load a sprite list and return its handle
    pub fn load_images<S: AssetStorage>(&mut self, storage: &mut S, path: &str, count: usize) -> Result<usize, AssetError> {
        let list = ImageList::load(storage, path, count)?;
        Ok(self.add_images(list))
    }

    /// Take ownership of a sprite list and return its handle
    pub fn add_images(&mut self, list: ImageList) -> usize {
        self.images.push(list);
        self.images.len() - 1
    }

    /// Sprite list behind `handle`
    ///
    /// # Panics
    /// Panics if `handle` was not returned by this display.
    pub fn images(&self, handle: usize) -> &ImageList {
        &self.images[handle]
    }

    /// Draw one glyph from the `size` font
    ///
    /// Returns `x` unchanged when the slot is empty or the code has no glyph.
    pub fn draw_char(&mut self, x: i16, y: i16, code: u16, size: FontSize, color: u8) -> i16 {
        match &self.fonts[size.index()] {
            Some(font) => self.canvas.draw_char(x, y, code, font, color),
            None => x,
        }
    }

    /// Draw multi-byte text with the `size` font
    pub fn draw_string(&mut self, x: i16, y: i16, text: &[u8], size: FontSize, color: u8) -> i16 {
        match &self.fonts[size.index()] {
            Some(font) => self.canvas.draw_string(x, y, text, font, color),
            None => x,
        }
    }

    /// Draw byte-per-code text with the `size` font
    pub fn draw_ascii(&mut self, x: i16, y: i16, text: &[u8], size: FontSize, color: u8) -> i16 {
        match &self.fonts[size.index()] {
            Some(font) => self.canvas.draw_ascii(x, y, text, font, color),
            None => x,
        }
    }

    /// Width of `text` in the `size` font, 0 when the slot is empty
    pub fn text_width(&self, text: &[u8], size: FontSize) -> i16 {
        self.font(size).map_or(0, |font| font.text_width(text))
    }

    /// Draw sprite `index` of list `handle`
    pub fn draw_image(&mut self, x: i16, y: i16, handle: usize, index: usize) {
        let image = self.images[handle].image(index);
        self.canvas.draw_image(x, y, image);
    }

    /// Render `text` into scroll text `row` with the `size` font
    ///
    /// An empty font slot clears the row.
    pub fn set_scroll_text(&self, scroll: &mut ScrollText, row: usize, text: &[u8], size: FontSize) {
        match self.font(size) {
            Some(font) => scroll.set_text(row, text, font),
            None => scroll.set_text(row, &[], &Font::with_capacity(0, 1)),
        }
    }

    pub fn draw_scroll_text(&mut self, row: usize, x: i16, y: i16, scroll: &ScrollText) {
        self.canvas.draw_scroll_text(row, x, y, scroll);
    }

    pub fn enable_popup(&mut self, rect: Rectangle) {
        self.canvas.enable_popup(rect);
    }

    pub fn disable_popup(&mut self) {
        self.canvas.disable_popup();
    }

    /// Run `f` with writes inside the popup region allowed
    pub fn with_popup<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.canvas.begin_popup_drawing();
        let result = f(self);
        self.canvas.end_popup_drawing();
        result
    }

    /// Send the whole frame to the panel
    pub fn present_all(&mut self) -> Result<(), InterfaceError> {
        self.panel.present_all(self.canvas.framebuffer())
    }

    /// Send the part of the frame covering `rect`
    pub fn present_rect(&mut self, rect: Rectangle) -> Result<(), InterfaceError> {
        self.panel.present_rect(self.canvas.framebuffer(), rect)
    }
}
