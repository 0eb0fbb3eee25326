//! Controller bus interfaces

mod parallel;

pub use parallel::ParallelInterface;

/// Bus transfer failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError {
    /// A control line could not be driven
    Pin,
    /// The data lines rejected a byte
    DataPort,
}

/// Byte-level access to the controller
///
/// Every transfer is either a command byte or a data byte; the
/// interface decides how the data/command select line is driven.
pub trait DisplayInterface {
    /// Send one command byte
    fn write_command(&mut self, cmd: u8) -> Result<(), InterfaceError>;

    /// Send one data byte
    fn write_data(&mut self, data: u8) -> Result<(), InterfaceError>;

    /// Send a run of data bytes
    fn write_data_slice(&mut self, data: &[u8]) -> Result<(), InterfaceError> {
        for &b in data {
            self.write_data(b)?;
        }
        Ok(())
    }
}

impl<T: DisplayInterface + ?Sized> DisplayInterface for &mut T {
    fn write_command(&mut self, cmd: u8) -> Result<(), InterfaceError> {
        (**self).write_command(cmd)
    }

    fn write_data(&mut self, data: u8) -> Result<(), InterfaceError> {
        (**self).write_data(data)
    }

    fn write_data_slice(&mut self, data: &[u8]) -> Result<(), InterfaceError> {
        (**self).write_data_slice(data)
    }
}
