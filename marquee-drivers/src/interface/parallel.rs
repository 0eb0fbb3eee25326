//! Bit-banged 8080/6800-style parallel bus
//!
//! Each byte is latched with the same sequence regardless of direction:
//!
//! ```text
//! D0..D7  ──< byte >────────────────────────────
//! D/C     ──┐ (low for command) ...........┌──── high
//! CS#     ────┐                          ┌──────
//! R/W#    ──────┐                      ┌────────
//! E       ________┌──1us──┐__1us__________________
//! ```
//!
//! The strobe width and the release order keep the controller's address
//! counter in step; do not reorder the pin writes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use marquee_hal::DataPort;

use super::{DisplayInterface, InterfaceError};

/// Minimum hold time for each enable phase
const STROBE_NS: u32 = 1_000;

/// Parallel bus built from a data port and four control lines
pub struct ParallelInterface<P, CS, DC, RW, E, D> {
    port: P,
    cs: CS,
    dc: DC,
    rw: RW,
    e: E,
    delay: D,
}

impl<P, CS, DC, RW, E, D> ParallelInterface<P, CS, DC, RW, E, D>
where
    P: DataPort,
    CS: OutputPin,
    DC: OutputPin,
    RW: OutputPin,
    E: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the bus lines and park them idle
    ///
    /// Idle is chip deselected, write disabled, data selected and the
    /// strobe low.
    pub fn new(port: P, cs: CS, dc: DC, rw: RW, e: E, delay: D) -> Result<Self, InterfaceError> {
        let mut bus = Self {
            port,
            cs,
            dc,
            rw,
            e,
            delay,
        };
        bus.cs.set_high().map_err(|_| InterfaceError::Pin)?;
        bus.rw.set_high().map_err(|_| InterfaceError::Pin)?;
        bus.dc.set_high().map_err(|_| InterfaceError::Pin)?;
        bus.e.set_low().map_err(|_| InterfaceError::Pin)?;
        Ok(bus)
    }

    /// Give the bus lines back
    pub fn release(self) -> (P, CS, DC, RW, E, D) {
        (self.port, self.cs, self.dc, self.rw, self.e, self.delay)
    }

    fn strobe(&mut self, value: u8, is_data: bool) -> Result<(), InterfaceError> {
        self.port.write(value).map_err(|_| InterfaceError::DataPort)?;
        let result = self.pulse(is_data);
        if result.is_err() {
            self.idle();
        }
        result
    }

    fn pulse(&mut self, is_data: bool) -> Result<(), InterfaceError> {
        let select = if is_data {
            self.dc.set_high()
        } else {
            self.dc.set_low()
        };
        select.map_err(|_| InterfaceError::Pin)?;

        self.cs.set_low().map_err(|_| InterfaceError::Pin)?;
        self.rw.set_low().map_err(|_| InterfaceError::Pin)?;
        self.e.set_high().map_err(|_| InterfaceError::Pin)?;
        self.delay.delay_ns(STROBE_NS);
        self.e.set_low().map_err(|_| InterfaceError::Pin)?;
        self.delay.delay_ns(STROBE_NS);
        self.rw.set_high().map_err(|_| InterfaceError::Pin)?;
        self.cs.set_high().map_err(|_| InterfaceError::Pin)?;
        self.dc.set_high().map_err(|_| InterfaceError::Pin)?;
        Ok(())
    }

    /// Best effort return to idle levels after a failed pulse
    fn idle(&mut self) {
        let _ = self.e.set_low();
        let _ = self.rw.set_high();
        let _ = self.cs.set_high();
        let _ = self.dc.set_high();
    }
}

impl<P, CS, DC, RW, E, D> DisplayInterface for ParallelInterface<P, CS, DC, RW, E, D>
where
    P: DataPort,
    CS: OutputPin,
    DC: OutputPin,
    RW: OutputPin,
    E: OutputPin,
    D: DelayNs,
{
    fn write_command(&mut self, cmd: u8) -> Result<(), InterfaceError> {
        self.strobe(cmd, false)
    }

    fn write_data(&mut self, data: u8) -> Result<(), InterfaceError> {
        self.strobe(data, true)
    }
}
