//! Drawing surface trait
//!
//! Views and overlays render through this instead of a concrete display
//! type, so they can be tested against an in-memory canvas.

use embedded_hal::delay::DelayNs;
use marquee_core::{Canvas, Rectangle};
use marquee_drivers::{Display, DisplayInterface, InterfaceError};

/// Canvas plus the two present operations
pub trait Surface {
    /// Error raised while pushing pixels to the panel
    type Error;

    /// The drawing canvas
    fn canvas(&mut self) -> &mut Canvas;

    /// Send the whole frame
    fn present_all(&mut self) -> Result<(), Self::Error>;

    /// Send the part of the frame covering `rect`
    fn present_rect(&mut self, rect: Rectangle) -> Result<(), Self::Error>;
}

impl<DI, D> Surface for Display<DI, D>
where
    DI: DisplayInterface,
    D: DelayNs,
{
    type Error = InterfaceError;

    fn canvas(&mut self) -> &mut Canvas {
        self.canvas_mut()
    }

    fn present_all(&mut self) -> Result<(), InterfaceError> {
        Display::present_all(self)
    }

    fn present_rect(&mut self, rect: Rectangle) -> Result<(), InterfaceError> {
        Display::present_rect(self, rect)
    }
}
