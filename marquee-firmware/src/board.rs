//! Board wiring
//!
//! Pin assignments for the reference board: the panel's 8-bit bus on
//! GPIO2..=GPIO9, control lines on GPIO10..=GPIO14, a push button on
//! GPIO15.
//!
//! ```text
//! GPIO2..9   D0..D7
//! GPIO10     CS#
//! GPIO11     D/C#
//! GPIO12     R/W#
//! GPIO13     E
//! GPIO14     RES#
//! GPIO15     button (to GND)
//! ```

use core::convert::Infallible;

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use embassy_time::{Delay, Instant};
use marquee_drivers::{Display, ParallelInterface};
use marquee_hal::{Clock, DataPort};

/// Eight data lines driven one pin at a time
///
/// The lines settle well within the strobe setup time, so writing them
/// individually is fine at this bus speed.
pub struct GpioPort {
    pins: [Output<'static>; 8],
}

impl GpioPort {
    /// Take D0..D7 in bit order and drive them low
    pub fn new(pins: [Peri<'static, AnyPin>; 8]) -> Self {
        Self {
            pins: pins.map(|pin| Output::new(pin, Level::Low)),
        }
    }
}

impl DataPort for GpioPort {
    type Error = Infallible;

    fn write(&mut self, value: u8) -> Result<(), Infallible> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            pin.set_level(Level::from(value & (1 << bit) != 0));
        }
        Ok(())
    }
}

/// Panel bus as wired on this board
pub type PanelBus = ParallelInterface<
    GpioPort,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Delay,
>;

/// Display context as wired on this board
pub type Panel = Display<PanelBus, Delay>;

/// Milliseconds since boot from the embassy time driver
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
