//! Panel and UI configuration
//!
//! Defaults match a 256x64 SSD1322 module with a 480-segment driver,
//! wired in dual-COM mode. The firmware can persist overrides with
//! postcard when the `serde` feature is on.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixels covered by one controller column address
pub const PIXELS_PER_COLUMN: u16 = 4;

/// Entries in the controller's custom grayscale table (levels 1..=15)
pub const GRAYSCALE_LEVELS: usize = 15;

/// Maximum asset path length
pub const MAX_PATH_LEN: usize = 24;

/// Controller and panel geometry plus the power-up register values
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// Segment outputs on the controller (480 for SSD1322)
    pub segment_count: u16,
    /// Front clock divider / oscillator frequency
    pub clock_divider: u8,
    /// Vertical scroll offset of COM0
    pub display_offset: u8,
    /// First RAM row mapped to the top of the panel
    pub start_line: u8,
    /// Re-map and dual COM mode bytes
    pub remap: [u8; 2],
    /// Function selection (internal VDD regulator)
    pub function_select: u8,
    /// Display enhancement A bytes
    pub enhancement_a: [u8; 2],
    /// Segment output current
    pub contrast_current: u8,
    /// Master contrast current control (0-15)
    pub master_contrast: u8,
    /// Phase 1/2 period lengths
    pub phase_length: u8,
    /// Display enhancement B bytes
    pub enhancement_b: [u8; 2],
    /// Pre-charge voltage level
    pub precharge_voltage: u8,
    /// Second pre-charge period
    pub second_precharge: u8,
    /// COM deselect voltage
    pub vcomh: u8,
    /// Gamma table for grayscale levels 1..=15
    pub grayscale_table: [u8; GRAYSCALE_LEVELS],
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 64,
            segment_count: 480,
            clock_divider: 0x91,
            display_offset: 0x00,
            start_line: 0x00,
            // horizontal increment, nibble re-map, dual COM
            remap: [0x14, 0x11],
            function_select: 0x01,
            enhancement_a: [0xA0, 0xFD],
            contrast_current: 0x9F,
            master_contrast: 0x0F,
            phase_length: 0xE2,
            enhancement_b: [0x82, 0x20],
            precharge_voltage: 0x1F,
            second_precharge: 0x08,
            vcomh: 0x07,
            grayscale_table: [0, 2, 5, 9, 14, 21, 29, 38, 48, 60, 73, 87, 102, 118, 136],
        }
    }
}

impl PanelConfig {
    /// Multiplex ratio register value (rows driven - 1)
    pub fn mux_ratio(&self) -> u8 {
        (self.height.saturating_sub(1) & 0x7F) as u8
    }

    /// First and last controller column of the visible area
    ///
    /// The visible pixels are centred within the segment range, one
    /// column address per four pixels.
    pub fn column_window(&self) -> (u8, u8) {
        let total = self.segment_count / PIXELS_PER_COLUMN;
        let used = self.width / PIXELS_PER_COLUMN;
        let start = total.saturating_sub(used) / 2;
        let end = total.saturating_sub(start).saturating_sub(1);
        (start as u8, end as u8)
    }
}

/// Scroll animation timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollTiming {
    /// Time between one-pixel steps while a row scrolls
    pub interval_ms: u32,
    /// Time both rows stay still before the next pass
    pub pause_ms: u32,
}

impl Default for ScrollTiming {
    fn default() -> Self {
        Self {
            interval_ms: 40,
            pause_ms: 4000,
        }
    }
}

/// Font slots held by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum FontSize {
    Small = 0,
    Large = 1,
    Tiny = 2,
}

impl FontSize {
    /// Number of font slots
    pub const COUNT: usize = 3;

    pub const ALL: [FontSize; Self::COUNT] = [FontSize::Small, FontSize::Large, FontSize::Tiny];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where a font lives and how tall it is
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSpec {
    pub size: FontSize,
    pub path: String<MAX_PATH_LEN>,
    pub height: i16,
}

impl FontSpec {
    /// Build a spec; paths longer than [`MAX_PATH_LEN`] are truncated
    pub fn new(size: FontSize, path: &str, height: i16) -> Self {
        let mut p = String::new();
        for ch in path.chars() {
            if p.push(ch).is_err() {
                break;
            }
        }
        Self {
            size,
            path: p,
            height,
        }
    }
}

/// The stock font set: tiny labels, small list text, large titles
pub fn default_fonts() -> [FontSpec; FontSize::COUNT] {
    [
        FontSpec::new(FontSize::Tiny, "font_t.dat", 9),
        FontSpec::new(FontSize::Small, "font_s.dat", 14),
        FontSpec::new(FontSize::Large, "font_l.dat", 16),
    ]
}
