//! Display task
//!
//! Owns the panel and every screen. Runs on a fixed frame tick: applies
//! queued commands and button events, then advances the active screen
//! (scrolling, uptime) and the level popup's idle timer.

use defmt::*;
use embassy_time::{Duration, Ticker};
use marquee_core::scroll::ROW_COUNT;
use marquee_core::Image;
use marquee_drivers::InterfaceError;
use marquee_hal::Clock;
use marquee_ui::{PopupOverlay, ViewController, BAR_WIDTH};

use crate::board::{Panel, UptimeClock};
use crate::channels::{ButtonEvent, DisplayCommand, BUTTON, COMMANDS};
use crate::screens::{Screen, NOW_PLAYING, SCREEN_COUNT};

/// Frame tick in milliseconds
const FRAME_MS: u64 = 10;

/// Level change per hold repeat, in percent
const LEVEL_STEP: u8 = 10;

/// Everything the display task takes ownership of
pub struct DisplayResources {
    pub panel: Panel,
    pub views: ViewController<Screen, SCREEN_COUNT>,
    /// Sprite drawn at the left of the level popup
    pub popup_label: Option<Image>,
}

struct DisplayState {
    panel: Panel,
    views: ViewController<Screen, SCREEN_COUNT>,
    popup: PopupOverlay,
    popup_label: Option<Image>,
    level: u8,
}

impl DisplayState {
    fn apply(&mut self, command: DisplayCommand, now_ms: u32) -> Result<(), InterfaceError> {
        match command {
            DisplayCommand::SetText { row, text } => {
                let row = row as usize;
                if row >= ROW_COUNT {
                    warn!("no marquee row {}", row);
                    return Ok(());
                }
                if let Some(Screen::NowPlaying(view)) = self.views.get_mut(NOW_PLAYING) {
                    view.set_text(&self.panel, row, &text, now_ms);
                }
                if self.views.active_id() == Some(NOW_PLAYING) {
                    self.views.invalidate(&mut self.panel, false)?;
                }
                Ok(())
            }
            DisplayCommand::ShowScreen(id) => self.views.show(&mut self.panel, id).map(|_| ()),
            DisplayCommand::Level(level) => {
                self.level = level.min(100);
                self.show_level(now_ms)
            }
        }
    }

    fn button(&mut self, event: ButtonEvent, now_ms: u32) -> Result<(), InterfaceError> {
        match event {
            ButtonEvent::Press if self.popup.is_visible() => self.popup.hide(&mut self.panel, &mut self.views),
            ButtonEvent::Press => self.views.handle_input(&mut self.panel, event).map(|_| ()),
            ButtonEvent::Hold => {
                self.level = if self.level >= 100 {
                    0
                } else {
                    (self.level + LEVEL_STEP).min(100)
                };
                self.show_level(now_ms)
            }
        }
    }

    fn show_level(&mut self, now_ms: u32) -> Result<(), InterfaceError> {
        let fill = self.level as i16 * BAR_WIDTH / 100;
        if self.popup.is_visible() {
            self.popup.touch(now_ms);
            self.popup.set_level(&mut self.panel, fill)
        } else {
            self.popup.show(&mut self.panel, now_ms, self.popup_label.as_ref(), fill)
        }
    }

    fn tick(&mut self, now_ms: u32) -> Result<(), InterfaceError> {
        self.views.update(&mut self.panel, now_ms)?;
        self.popup.update(&mut self.panel, &mut self.views, now_ms)?;
        Ok(())
    }
}

fn report(result: Result<(), InterfaceError>) {
    if let Err(e) = result {
        warn!("panel write failed: {}", e);
    }
}

#[embassy_executor::task]
pub async fn display_task(resources: DisplayResources) {
    info!("Display task started");

    let DisplayResources {
        panel,
        views,
        popup_label,
    } = resources;
    let mut state = DisplayState {
        panel,
        views,
        popup: PopupOverlay::default(),
        popup_label,
        level: 50,
    };

    let clock = UptimeClock;
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_MS));

    loop {
        ticker.next().await;
        let now_ms = clock.now_ms();

        while let Ok(command) = COMMANDS.try_receive() {
            report(state.apply(command, now_ms));
        }
        while let Ok(event) = BUTTON.try_receive() {
            trace!("button {}", event);
            report(state.button(event, now_ms));
        }
        report(state.tick(now_ms));
    }
}
