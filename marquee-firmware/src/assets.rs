//! Flash-resident asset bundle
//!
//! Fonts, sprite lists and the settings blob are flashed as one bundle
//! into the last 512KB of the 2MB flash, separately from the firmware
//! image. The bundle starts with a small directory:
//!
//! ```text
//! 0   "MQAB"
//! 4   entry count (u16 LE)
//! 6   reserved (u16)
//! 8   entries, 32 bytes each:
//!       name     24 bytes, NUL padded
//!       offset   u32 LE, from the bundle start
//!       length   u32 LE
//! ```

use defmt::*;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_io::{ErrorKind, ErrorType, Read};
use heapless::Vec;
use marquee_hal::{AssetStorage, StorageError};

/// Flash size on the reference board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Space reserved for the bundle at the end of flash
pub const BUNDLE_SIZE: u32 = 512 * 1024;

/// Flash offset of the bundle
pub const BUNDLE_START: u32 = FLASH_SIZE as u32 - BUNDLE_SIZE;

const MAGIC: [u8; 4] = *b"MQAB";
const HEADER_LEN: u32 = 8;
const ENTRY_LEN: u32 = 32;
const NAME_LEN: usize = 24;
const MAX_ENTRIES: usize = 32;

type BundleFlash<'d> = Flash<'d, FLASH, Blocking, FLASH_SIZE>;

/// Errors while mounting the bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BundleError {
    /// Flash read failed
    Flash,
    /// No bundle header at [`BUNDLE_START`]
    Missing,
    /// Directory does not fit the reserved area
    Corrupted,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    name: [u8; NAME_LEN],
    offset: u32,
    len: u32,
}

impl Entry {
    fn parse(raw: &[u8; ENTRY_LEN as usize]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&raw[..NAME_LEN]);
        let word = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        Self {
            name,
            offset: word(NAME_LEN),
            len: word(NAME_LEN + 4),
        }
    }

    fn name(&self) -> &[u8] {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.name[..end]
    }
}

/// Read-only asset storage over the flash bundle
pub struct FlashBundle<'d> {
    flash: BundleFlash<'d>,
    entries: Vec<Entry, MAX_ENTRIES>,
}

impl<'d> FlashBundle<'d> {
    /// Read the bundle directory
    pub fn mount(flash: Peri<'d, FLASH>) -> Result<Self, BundleError> {
        let mut flash = BundleFlash::new_blocking(flash);

        let mut header = [0u8; HEADER_LEN as usize];
        flash
            .blocking_read(BUNDLE_START, &mut header)
            .map_err(|_| BundleError::Flash)?;
        if header[..4] != MAGIC {
            return Err(BundleError::Missing);
        }

        let count = u16::from_le_bytes([header[4], header[5]]) as usize;
        if count > MAX_ENTRIES {
            return Err(BundleError::Corrupted);
        }

        let mut entries = Vec::new();
        for i in 0..count as u32 {
            let mut raw = [0u8; ENTRY_LEN as usize];
            flash
                .blocking_read(BUNDLE_START + HEADER_LEN + i * ENTRY_LEN, &mut raw)
                .map_err(|_| BundleError::Flash)?;
            let entry = Entry::parse(&raw);
            let end = entry.offset.checked_add(entry.len).ok_or(BundleError::Corrupted)?;
            if end > BUNDLE_SIZE {
                return Err(BundleError::Corrupted);
            }
            entries.push(entry).map_err(|_| BundleError::Corrupted)?;
        }

        info!("asset bundle mounted: {} entries", entries.len());
        Ok(Self { flash, entries })
    }

    fn find(&self, path: &str) -> Option<Entry> {
        self.entries.iter().find(|e| e.name() == path.as_bytes()).copied()
    }
}

impl<'d> AssetStorage for FlashBundle<'d> {
    type File<'a> = BundleFile<'a, 'd>
    where
        Self: 'a;

    fn open<'a>(&'a mut self, path: &str) -> Result<BundleFile<'a, 'd>, StorageError> {
        let entry = self.find(path).ok_or(StorageError::NotFound)?;
        Ok(BundleFile {
            flash: &mut self.flash,
            pos: entry.offset,
            end: entry.offset + entry.len,
        })
    }

    fn exists(&mut self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

/// Flash read failure surfaced through `embedded_io`
#[derive(Debug, Clone, Copy)]
pub struct FlashReadError;

impl embedded_io::Error for FlashReadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Sequential reader over one bundle entry
pub struct BundleFile<'a, 'd> {
    flash: &'a mut BundleFlash<'d>,
    pos: u32,
    end: u32,
}

impl ErrorType for BundleFile<'_, '_> {
    type Error = FlashReadError;
}

impl Read for BundleFile<'_, '_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FlashReadError> {
        let n = buf.len().min((self.end - self.pos) as usize);
        if n == 0 {
            return Ok(0);
        }
        self.flash
            .blocking_read(BUNDLE_START + self.pos, &mut buf[..n])
            .map_err(|_| FlashReadError)?;
        self.pos += n as u32;
        Ok(n)
    }
}
