//! Asset storage abstractions
//!
//! Fonts and sprite lists are stored as flat binary files on whatever
//! medium the board provides (SD card, a flash partition, ...). The
//! display subsystem only needs to open a file by name and read it
//! sequentially.

use embedded_io::Read;

/// Errors from asset storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No asset with the requested name
    NotFound,
    /// Underlying medium failed
    Io,
}

/// Read-only named asset storage
///
/// Each opened file is an `embedded_io::Read` stream positioned at the
/// first byte of the asset.
pub trait AssetStorage {
    /// Sequential reader over one asset
    type File<'a>: Read
    where
        Self: 'a;

    /// Open the asset called `path`
    fn open<'a>(&'a mut self, path: &str) -> Result<Self::File<'a>, StorageError>;

    /// Check if an asset exists
    fn exists(&mut self, path: &str) -> bool {
        self.open(path).is_ok()
    }
}
