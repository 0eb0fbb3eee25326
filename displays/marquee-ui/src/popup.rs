//! Timed popup overlay
//!
//! A small framed box with an optional label sprite and a level bar,
//! drawn over the active view. While visible it owns the canvas popup
//! region, so the view underneath keeps drawing without touching it.
//! After [`IDLE_TIMEOUT_MS`] without a [`PopupOverlay::touch`] it closes
//! itself and asks the active view to restore the uncovered area.

use marquee_core::{Image, Rectangle};
use marquee_hal::clock::deadline_reached;

use crate::surface::Surface;
use crate::view::{View, ViewController};

/// Idle time before the popup closes itself
pub const IDLE_TIMEOUT_MS: u32 = 5000;

/// Full-scale width of the level bar in pixels
pub const BAR_WIDTH: i16 = 80;

const BAR_HEIGHT: i16 = 8;
const BAR_LEFT: i16 = 43;
const BAR_TOP: i16 = 4;

const BAR_ON: u8 = 0x0F;
const BAR_OFF: u8 = 0x07;

/// Modal box over the bottom of the screen
pub struct PopupOverlay {
    rect: Rectangle,
    timeout_ms: u32,
    visible: bool,
    deadline: u32,
}

impl Default for PopupOverlay {
    fn default() -> Self {
        Self::new(Rectangle::new(64, 48, 128, 16), IDLE_TIMEOUT_MS)
    }
}

impl PopupOverlay {
    pub fn new(rect: Rectangle, timeout_ms: u32) -> Self {
        Self {
            rect,
            timeout_ms,
            visible: false,
            deadline: 0,
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Screen area of the level bar
    pub fn bar_rect(&self) -> Rectangle {
        Rectangle::new(self.rect.left + BAR_LEFT, self.rect.top + BAR_TOP, BAR_WIDTH, BAR_HEIGHT)
    }

    /// Open the popup and draw it
    ///
    /// `level` is the bar fill in pixels, clamped to `0..=BAR_WIDTH`.
    pub fn show<S: Surface>(&mut self, surface: &mut S, now_ms: u32, label: Option<&Image>, level: i16) -> Result<(), S::Error> {
        self.visible = true;
        self.touch(now_ms);
        surface.canvas().enable_popup(self.rect);
        self.refresh(surface, label, level)
    }

    /// Redraw the whole box and push it to the panel
    pub fn refresh<S: Surface>(&mut self, surface: &mut S, label: Option<&Image>, level: i16) -> Result<(), S::Error> {
        {
            let mut canvas = surface.canvas().popup_drawing();
            canvas.fill_rect(self.rect, 0x00);
            let frame = self.rect.inflated(-1, -1);
            canvas.draw_rect(frame, 0x0F);
            if let Some(image) = label {
                canvas.draw_image(frame.left + 4, frame.top + 3, image);
            }
            self.draw_bar(&mut canvas, level);
        }
        surface.present_rect(self.rect)
    }

    /// Redraw only the level bar
    pub fn set_level<S: Surface>(&mut self, surface: &mut S, level: i16) -> Result<(), S::Error> {
        if !self.visible {
            return Ok(());
        }
        {
            let mut canvas = surface.canvas().popup_drawing();
            self.draw_bar(&mut canvas, level);
        }
        surface.present_rect(self.bar_rect())
    }

    fn draw_bar(&self, canvas: &mut marquee_core::Canvas, level: i16) {
        let bar = self.bar_rect();
        let mark = level.clamp(0, BAR_WIDTH);
        canvas.fill_rect(Rectangle::new(bar.left, bar.top, mark, BAR_HEIGHT), BAR_ON);
        canvas.fill_rect(
            Rectangle::new(bar.left + mark, bar.top, BAR_WIDTH - mark, BAR_HEIGHT),
            BAR_OFF,
        );
    }

    /// Restart the idle timer
    pub fn touch(&mut self, now_ms: u32) {
        self.deadline = now_ms.wrapping_add(self.timeout_ms);
    }

    /// Close the popup and let the active view redraw underneath
    pub fn hide<S, V, const N: usize>(&mut self, surface: &mut S, views: &mut ViewController<V, N>) -> Result<(), S::Error>
    where
        S: Surface,
        V: View<S>,
    {
        self.visible = false;
        surface.canvas().disable_popup();
        views.invalidate(surface, true)
    }

    /// Close the popup once the idle timeout has passed
    ///
    /// Returns whether it closed on this call.
    pub fn update<S, V, const N: usize>(
        &mut self,
        surface: &mut S,
        views: &mut ViewController<V, N>,
        now_ms: u32,
    ) -> Result<bool, S::Error>
    where
        S: Surface,
        V: View<S>,
    {
        if !self.visible || !deadline_reached(now_ms, self.deadline) {
            return Ok(false);
        }
        debug!("popup idle timeout");
        self.hide(surface, views)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::{controller, TestSurface};

    #[test]
    fn test_show_draws_frame_and_protects_region() {
        let mut surface = TestSurface::new();
        let mut views = controller();
        views.show(&mut surface, 0).unwrap();

        let mut popup = PopupOverlay::default();
        popup.show(&mut surface, 1000, None, 40).unwrap();

        assert!(popup.is_visible());
        assert_eq!(surface.canvas.popup(), Some(popup.rect()));
        assert_eq!(surface.rects.last(), Some(&popup.rect()));
        // outer border cleared, inner frame lit
        assert_eq!(surface.canvas.pixel(64, 48), 0x00);
        assert_eq!(surface.canvas.pixel(65, 49), 0x0F);
        assert_eq!(surface.canvas.pixel(190, 62), 0x0F);
        // bar: 40 px on, the rest dimmed
        assert_eq!(surface.canvas.pixel(107, 52), BAR_ON);
        assert_eq!(surface.canvas.pixel(146, 52), BAR_ON);
        assert_eq!(surface.canvas.pixel(147, 52), BAR_OFF);

        // the view below cannot draw over it
        views.invalidate(&mut surface, false).unwrap();
        assert_eq!(surface.canvas.pixel(65, 49), 0x0F);
        assert_eq!(surface.canvas.pixel(10, 10), 0x3);
    }

    #[test]
    fn test_label_sprite() {
        let mut surface = TestSurface::new();
        let label = Image::from_packed(2, 1, &[0xAB]).unwrap();
        let mut popup = PopupOverlay::default();
        popup.show(&mut surface, 0, Some(&label), 0).unwrap();
        assert_eq!(surface.canvas.pixel(69, 52), 0xA);
        assert_eq!(surface.canvas.pixel(70, 52), 0xB);
    }

    #[test]
    fn test_set_level_presents_bar_only() {
        let mut surface = TestSurface::new();
        let mut popup = PopupOverlay::default();
        popup.set_level(&mut surface, 10).unwrap();
        assert!(surface.rects.is_empty());

        popup.show(&mut surface, 0, None, 0).unwrap();
        popup.set_level(&mut surface, 200).unwrap();
        assert_eq!(surface.rects.last(), Some(&popup.bar_rect()));
        assert_eq!(surface.canvas.pixel(107 + BAR_WIDTH - 1, 52), BAR_ON);
    }

    #[test]
    fn test_idle_timeout_restores_view() {
        let mut surface = TestSurface::new();
        let mut views = controller();
        views.show(&mut surface, 1).unwrap();

        let mut popup = PopupOverlay::default();
        popup.show(&mut surface, 500, None, 10).unwrap();
        assert!(!popup.update(&mut surface, &mut views, 500 + IDLE_TIMEOUT_MS - 1).unwrap());

        popup.touch(3000);
        assert!(!popup.update(&mut surface, &mut views, 500 + IDLE_TIMEOUT_MS).unwrap());
        assert!(popup.update(&mut surface, &mut views, 3000 + IDLE_TIMEOUT_MS).unwrap());

        assert!(!popup.is_visible());
        assert_eq!(surface.canvas.popup(), None);
        assert_eq!(views.get(1).unwrap().partial_redraws, 1);
        assert_eq!(surface.canvas.pixel(100, 55), 0x9);

        // closed popups do not fire again
        assert!(!popup.update(&mut surface, &mut views, 100_000).unwrap());
    }
}
