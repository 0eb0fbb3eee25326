//! SSD1322 OLED controller driver
//!
//! Driver for 256x64 4-bit grayscale panels behind an SSD1322. The
//! controller addresses its RAM in columns of four pixels (two bytes),
//! and the visible area is centred in the 480-segment range, so the
//! framebuffer's byte layout maps one-to-one onto a column window.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use marquee_core::config::{PanelConfig, PIXELS_PER_COLUMN};
use marquee_core::{Framebuffer, Rectangle};

use crate::interface::{DisplayInterface, InterfaceError};

/// SSD1322 commands
pub mod cmd {
    pub const ENABLE_GRAYSCALE: u8 = 0x00;
    pub const COL_ADDRESS: u8 = 0x15;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const ROW_ADDRESS: u8 = 0x75;
    pub const REMAP: u8 = 0xA0;
    pub const START_LINE: u8 = 0xA1;
    pub const DISPLAY_OFFSET: u8 = 0xA2;
    pub const MODE_ALL_OFF: u8 = 0xA4;
    pub const MODE_ALL_ON: u8 = 0xA5;
    pub const MODE_NORMAL: u8 = 0xA6;
    pub const MODE_INVERT: u8 = 0xA7;
    pub const FUNCTION_SELECT: u8 = 0xAB;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const PHASE_LENGTH: u8 = 0xB1;
    pub const CLOCK_DIVIDER: u8 = 0xB3;
    pub const ENHANCEMENT_A: u8 = 0xB4;
    pub const SECOND_PRECHARGE: u8 = 0xB6;
    pub const SET_GRAYSCALE_TABLE: u8 = 0xB8;
    pub const PRECHARGE_VOLTAGE: u8 = 0xBB;
    pub const SET_VCOMH: u8 = 0xBE;
    pub const CONTRAST_CURRENT: u8 = 0xC1;
    pub const MASTER_CONTRAST: u8 = 0xC7;
    pub const MUX_RATIO: u8 = 0xCA;
    pub const ENHANCEMENT_B: u8 = 0xD1;
    pub const COMMAND_LOCK: u8 = 0xFD;

    /// Data byte for [`COMMAND_LOCK`] that unlocks the command interface
    pub const UNLOCK: u8 = 0x12;
}

/// Panel-wide display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Show RAM contents
    #[default]
    Normal,
    /// Every pixel at full level
    AllOn,
    /// Every pixel dark
    AllOff,
    /// RAM contents with levels inverted
    Invert,
}

impl DisplayMode {
    fn command(self) -> u8 {
        match self {
            DisplayMode::Normal => cmd::MODE_NORMAL,
            DisplayMode::AllOn => cmd::MODE_ALL_ON,
            DisplayMode::AllOff => cmd::MODE_ALL_OFF,
            DisplayMode::Invert => cmd::MODE_INVERT,
        }
    }
}

/// Settle time after releasing reset before the first command
const POWER_UP_MS: u32 = 300;

/// Settle time after switching the panel on
const DISPLAY_ON_MS: u32 = 200;

/// SSD1322 driver
pub struct Ssd1322<DI, D> {
    iface: DI,
    delay: D,
    config: PanelConfig,
    start_col: u8,
    end_col: u8,
}

impl<DI, D> Ssd1322<DI, D>
where
    DI: DisplayInterface,
    D: DelayNs,
{
    /// Create a driver for the panel described by `config`
    pub fn new(iface: DI, delay: D, config: PanelConfig) -> Self {
        let (start_col, end_col) = config.column_window();
        Self {
            iface,
            delay,
            config,
            start_col,
            end_col,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// First and last controller column of the visible area
    pub fn column_window(&self) -> (u8, u8) {
        (self.start_col, self.end_col)
    }

    pub fn interface(&self) -> &DI {
        &self.iface
    }

    /// Give back the interface and delay
    pub fn release(self) -> (DI, D) {
        (self.iface, self.delay)
    }

    /// Pulse the reset line and wait for the controller to come up
    pub fn reset<RST: OutputPin>(&mut self, rst: &mut RST) -> Result<(), InterfaceError> {
        // VDD can take up to 1 ms to stabilise after power-on
        self.delay.delay_ms(1);
        rst.set_low().map_err(|_| InterfaceError::Pin)?;
        self.delay.delay_ms(1);
        rst.set_high().map_err(|_| InterfaceError::Pin)?;
        self.delay.delay_ms(1);
        self.delay.delay_ms(POWER_UP_MS);
        Ok(())
    }

    /// Run the power-up configuration and switch the panel on
    pub fn init(&mut self) -> Result<(), InterfaceError> {
        let cfg = self.config.clone();

        self.command(cmd::COMMAND_LOCK, &[cmd::UNLOCK])?;
        self.command(cmd::DISPLAY_OFF, &[])?;
        self.command(cmd::CLOCK_DIVIDER, &[cfg.clock_divider])?;
        self.command(cmd::MUX_RATIO, &[cfg.mux_ratio()])?;
        self.set_display_offset(cfg.display_offset)?;
        self.set_start_line(cfg.start_line)?;
        self.set_column_range(self.start_col, self.end_col)?;
        self.set_row_range(0, cfg.mux_ratio())?;
        self.command(cmd::REMAP, &cfg.remap)?;
        self.command(cmd::FUNCTION_SELECT, &[cfg.function_select])?;
        self.command(cmd::ENHANCEMENT_A, &cfg.enhancement_a)?;
        self.set_contrast(cfg.contrast_current)?;
        self.command(cmd::MASTER_CONTRAST, &[cfg.master_contrast & 0x0F])?;
        self.set_grayscale_table(&cfg.grayscale_table)?;
        self.command(cmd::PHASE_LENGTH, &[cfg.phase_length])?;
        self.command(cmd::ENHANCEMENT_B, &cfg.enhancement_b)?;
        self.command(cmd::PRECHARGE_VOLTAGE, &[cfg.precharge_voltage])?;
        self.command(cmd::SECOND_PRECHARGE, &[cfg.second_precharge])?;
        self.command(cmd::SET_VCOMH, &[cfg.vcomh])?;
        self.set_display_mode(DisplayMode::Normal)?;
        self.command(cmd::DISPLAY_ON, &[])?;

        info!("SSD1322 ready, columns {}..={}", self.start_col, self.end_col);
        Ok(())
    }

    /// Send a command followed by its parameter bytes
    pub fn command(&mut self, command: u8, params: &[u8]) -> Result<(), InterfaceError> {
        self.iface.write_command(command)?;
        self.iface.write_data_slice(params)
    }

    /// Leave sleep mode and wait for the panel to light up
    pub fn display_on(&mut self) -> Result<(), InterfaceError> {
        self.command(cmd::DISPLAY_ON, &[])?;
        self.delay.delay_ms(DISPLAY_ON_MS);
        Ok(())
    }

    /// Enter sleep mode
    pub fn display_off(&mut self) -> Result<(), InterfaceError> {
        self.command(cmd::DISPLAY_OFF, &[])
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) -> Result<(), InterfaceError> {
        self.command(mode.command(), &[])
    }

    /// Segment output current (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), InterfaceError> {
        self.command(cmd::CONTRAST_CURRENT, &[contrast])
    }

    /// RAM row shown at the top of the panel
    pub fn set_start_line(&mut self, row: u8) -> Result<(), InterfaceError> {
        self.command(cmd::START_LINE, &[row & 0x7F])
    }

    /// Vertical shift of COM0
    pub fn set_display_offset(&mut self, row: u8) -> Result<(), InterfaceError> {
        self.command(cmd::DISPLAY_OFFSET, &[row & 0x7F])
    }

    /// Load the gamma table for levels 1..=15 and enable it
    pub fn set_grayscale_table(&mut self, table: &[u8; 15]) -> Result<(), InterfaceError> {
        self.command(cmd::SET_GRAYSCALE_TABLE, table)?;
        self.command(cmd::ENABLE_GRAYSCALE, &[])
    }

    /// Restrict RAM writes to columns `c1..=c2`
    pub fn set_column_range(&mut self, c1: u8, c2: u8) -> Result<(), InterfaceError> {
        self.command(cmd::COL_ADDRESS, &[c1 & 0x7F, c2 & 0x7F])
    }

    /// Restrict RAM writes to rows `r1..=r2`
    pub fn set_row_range(&mut self, r1: u8, r2: u8) -> Result<(), InterfaceError> {
        self.command(cmd::ROW_ADDRESS, &[r1 & 0x7F, r2 & 0x7F])
    }

    /// Stream the whole frame
    pub fn present_all(&mut self, fb: &Framebuffer) -> Result<(), InterfaceError> {
        self.set_column_range(self.start_col, self.end_col)?;
        self.set_row_range(0, (fb.height() - 1).max(0) as u8)?;
        self.iface.write_command(cmd::WRITE_RAM)?;
        for y in 0..fb.height() as usize {
            self.iface.write_data_slice(fb.row(y))?;
        }
        Ok(())
    }

    /// Stream the column-aligned bytes covering `rect`
    ///
    /// The rectangle is clipped to the frame first; an empty result sends
    /// nothing. The left edge rounds down and the right edge rounds up to
    /// whole controller columns.
    pub fn present_rect(&mut self, fb: &Framebuffer, rect: Rectangle) -> Result<(), InterfaceError> {
        let rc = rect.clip(fb.width(), fb.height());
        if rc.is_empty() {
            return Ok(());
        }

        let ppc = PIXELS_PER_COLUMN as i16;
        let col_l = self.start_col as i16 + rc.left / ppc;
        let col_r = (self.start_col as i16 + rc.right() / ppc).min(self.end_col as i16);
        self.set_column_range(col_l as u8, col_r as u8)?;
        self.set_row_range(rc.top as u8, rc.bottom() as u8)?;
        self.iface.write_command(cmd::WRITE_RAM)?;

        let start = (rc.left / ppc) as usize * 2;
        let end = (start + (col_r - col_l + 1) as usize * 2).min(fb.stride());
        for y in rc.top..=rc.bottom() {
            self.iface.write_data_slice(&fb.row(y as usize)[start..end])?;
        }
        Ok(())
    }
}
