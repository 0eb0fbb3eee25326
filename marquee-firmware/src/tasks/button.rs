//! Push button task
//!
//! Debounces the button and turns it into press and hold events. A hold
//! keeps repeating while the button stays down.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use crate::channels::{ButtonEvent, BUTTON};

const DEBOUNCE_MS: u64 = 20;
const HOLD_MS: u64 = 600;
const REPEAT_MS: u64 = 150;

#[embassy_executor::task]
pub async fn button_task(mut pin: Input<'static>) {
    info!("Button task started");

    loop {
        pin.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if pin.is_high() {
            continue;
        }

        if with_timeout(Duration::from_millis(HOLD_MS), pin.wait_for_rising_edge())
            .await
            .is_ok()
        {
            BUTTON.send(ButtonEvent::Press).await;
            continue;
        }

        BUTTON.send(ButtonEvent::Hold).await;
        while with_timeout(Duration::from_millis(REPEAT_MS), pin.wait_for_rising_edge())
            .await
            .is_err()
        {
            BUTTON.send(ButtonEvent::Hold).await;
        }
        trace!("button released");
    }
}
