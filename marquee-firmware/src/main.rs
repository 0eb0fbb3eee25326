//! Marquee - Grayscale OLED Display Firmware
//!
//! RP2040 firmware driving a 256x64 SSD1322 panel over its 8-bit
//! parallel bus. Fonts and sprites come from an asset bundle flashed
//! next to the firmware; a single push button switches screens and
//! adjusts a level shown in a popup.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use heapless::String;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::scroll::MAX_VIEWPORT_WIDTH;
use marquee_drivers::{Display, ParallelInterface, Ssd1322};
use marquee_ui::ViewController;

mod assets;
mod board;
mod channels;
mod screens;
mod settings;
mod tasks;

use crate::assets::FlashBundle;
use crate::board::{GpioPort, Panel};
use crate::channels::{DisplayCommand, COMMANDS, MAX_TEXT_LEN};
use crate::screens::{NowPlaying, Screen, Status, NOW_PLAYING, SCREEN_COUNT, STATUS};
use crate::settings::Settings;

// Fonts, sprite lists and the scroll line buffers live on the heap
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 160KB (the two scroll rows alone take 64KB)
const HEAP_SIZE: usize = 160 * 1024;

/// Sprite list shown on the status screen
const ICONS_PATH: &str = "icons.dat";
const ICON_COUNT: usize = 2;

/// Label sprite for the level popup
const LABELS_PATH: &str = "labels.dat";
const LABEL_COUNT: usize = 1;

const WELCOME: [&str; 2] = ["Marquee", "Grayscale OLED display subsystem running on RP2040"];

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut bundle = match FlashBundle::mount(p.FLASH) {
        Ok(bundle) => Some(bundle),
        Err(e) => {
            warn!("No asset bundle ({}), text and sprites disabled", e);
            None
        }
    };
    let settings = match bundle.as_mut() {
        Some(bundle) => settings::load(bundle),
        None => Settings::default(),
    };

    // Panel bus, see board.rs for the pin map
    let port = GpioPort::new([
        p.PIN_2.into(),
        p.PIN_3.into(),
        p.PIN_4.into(),
        p.PIN_5.into(),
        p.PIN_6.into(),
        p.PIN_7.into(),
        p.PIN_8.into(),
        p.PIN_9.into(),
    ]);
    let cs = Output::new(p.PIN_10, Level::High);
    let dc = Output::new(p.PIN_11, Level::High);
    let rw = Output::new(p.PIN_12, Level::High);
    let e = Output::new(p.PIN_13, Level::Low);
    let mut rst = Output::new(p.PIN_14, Level::High);

    let bus = unwrap!(ParallelInterface::new(port, cs, dc, rw, e, Delay));
    let mut ssd = Ssd1322::new(bus, Delay, settings.panel.clone());
    unwrap!(ssd.reset(&mut rst));

    let mut panel: Panel = Display::new(ssd);
    unwrap!(panel.init());
    info!("Panel initialized");

    let mut icons = None;
    let mut popup_label = None;
    if let Some(bundle) = bundle.as_mut() {
        if let Err(e) = panel.load_fonts(bundle, &settings.fonts) {
            warn!("Font set incomplete: {}", e);
        }
        match panel.load_images(bundle, ICONS_PATH, ICON_COUNT) {
            Ok(handle) => icons = Some(handle),
            Err(e) => warn!("Icons unavailable: {}", e),
        }
        match panel.load_images(bundle, LABELS_PATH, LABEL_COUNT) {
            Ok(handle) => popup_label = panel.images(handle).get(0).cloned(),
            Err(e) => warn!("Popup label unavailable: {}", e),
        }
    }

    let width = panel.canvas().width().min(MAX_VIEWPORT_WIDTH);
    let mut views: ViewController<Screen, SCREEN_COUNT> = ViewController::new();
    let now_playing = NowPlaying::new(width, settings.scroll);
    if views.add(NOW_PLAYING, Screen::NowPlaying(now_playing)).is_err()
        || views.add(STATUS, Screen::Status(Status::new(icons))).is_err()
    {
        defmt::panic!("screen table too small");
    }
    unwrap!(views.init_all(&mut panel));
    unwrap!(views.show(&mut panel, NOW_PLAYING));

    let button = Input::new(p.PIN_15, Pull::Up);

    spawner
        .spawn(tasks::display_task(tasks::DisplayResources {
            panel,
            views,
            popup_label,
        }))
        .unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();

    for (row, line) in WELCOME.iter().enumerate() {
        let mut text: String<MAX_TEXT_LEN> = String::new();
        for ch in line.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        COMMANDS
            .send(DisplayCommand::SetText { row: row as u8, text })
            .await;
    }

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
