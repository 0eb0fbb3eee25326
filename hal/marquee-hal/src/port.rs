//! Parallel data port abstraction
//!
//! The panel controller is wired through eight data lines that are
//! driven together. On most boards these sit on one GPIO port register,
//! so a whole byte is latched with a single write.

/// 8-bit parallel data lines (D0..D7)
///
/// Implementations place `value` on the data lines and return once the
/// lines are stable. Control strobes are handled separately by the
/// driver through `embedded-hal` output pins.
pub trait DataPort {
    /// Error type for port operations
    type Error;

    /// Drive the eight data lines with `value` (bit 0 = D0)
    fn write(&mut self, value: u8) -> Result<(), Self::Error>;
}

impl<T: DataPort + ?Sized> DataPort for &mut T {
    type Error = T::Error;

    fn write(&mut self, value: u8) -> Result<(), Self::Error> {
        T::write(self, value)
    }
}
