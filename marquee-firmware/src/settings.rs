//! Persisted display settings
//!
//! Stored in the asset bundle as `settings.bin`, postcard encoded. Any
//! problem reading it falls back to the built-in defaults.

use defmt::*;
use embedded_io::Read;
use heapless::Vec;
use marquee_core::config::{default_fonts, FontSize, FontSpec, PanelConfig, ScrollTiming};
use marquee_hal::AssetStorage;
use serde::{Deserialize, Serialize};

/// Bundle entry holding the settings
pub const SETTINGS_PATH: &str = "settings.bin";

const MAX_SETTINGS_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub panel: PanelConfig,
    pub scroll: ScrollTiming,
    pub fonts: Vec<FontSpec, { FontSize::COUNT }>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            scroll: ScrollTiming::default(),
            fonts: default_fonts().into_iter().collect(),
        }
    }
}

/// Load settings from `storage`, or the defaults if absent or unreadable
pub fn load<S: AssetStorage>(storage: &mut S) -> Settings {
    let mut buf = [0u8; MAX_SETTINGS_SIZE];
    let len = match storage.open(SETTINGS_PATH) {
        Ok(mut file) => {
            let mut len = 0;
            loop {
                match file.read(&mut buf[len..]) {
                    Ok(0) => break,
                    Ok(n) => len += n,
                    Err(_) => {
                        warn!("settings read failed, using defaults");
                        return Settings::default();
                    }
                }
                if len == buf.len() {
                    break;
                }
            }
            len
        }
        Err(_) => {
            info!("no stored settings, using defaults");
            return Settings::default();
        }
    };

    match postcard::from_bytes(&buf[..len]) {
        Ok(settings) => {
            info!("loaded settings ({} bytes)", len);
            settings
        }
        Err(_) => {
            warn!("stored settings invalid, using defaults");
            Settings::default()
        }
    }
}
