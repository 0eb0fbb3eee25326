//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;
use marquee_ui::ViewId;

/// Longest text line accepted for a scroll row
pub const MAX_TEXT_LEN: usize = 96;

const COMMAND_CHANNEL_SIZE: usize = 4;
const BUTTON_CHANNEL_SIZE: usize = 4;

/// Requests for the display task
#[derive(Debug, Clone)]
pub enum DisplayCommand {
    /// Replace the text of one marquee row
    SetText { row: u8, text: String<MAX_TEXT_LEN> },
    /// Switch to another screen
    ShowScreen(ViewId),
    /// Show the level popup at this fill (0..=100)
    Level(u8),
}

/// Debounced button events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Short press and release
    Press,
    /// Held past the hold threshold; repeats while held
    Hold,
}

/// Commands for the display task
pub static COMMANDS: Channel<CriticalSectionRawMutex, DisplayCommand, COMMAND_CHANNEL_SIZE> = Channel::new();

/// Button events from the button task
pub static BUTTON: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_CHANNEL_SIZE> = Channel::new();
